use crate::error::ConfigError;
use crate::model::{DistrictId, DistrictMap, TravelModel};
use crate::sim::{SimRng, SimTime};

fn model() -> TravelModel {
    TravelModel::new(DistrictMap::default())
}

#[test]
fn base_time_is_matrix_minutes_in_seconds() {
    let travel = model();
    assert_eq!(travel.base_secs(DistrictId(1), DistrictId(2)).expect("base"), 300.0);
    assert_eq!(travel.base_secs(DistrictId(4), DistrictId(1)).expect("base"), 840.0);
    // intra-district time is non-zero in the reference city
    assert_eq!(travel.base_secs(DistrictId(3), DistrictId(3)).expect("base"), 300.0);
}

#[test]
fn travel_time_stays_within_half_to_one_and_a_half_base() {
    let travel = model();
    let mut rng = SimRng::seed_from_u64(7);
    let mut seen_low = false;
    let mut seen_high = false;
    for _ in 0..500 {
        let t = travel
            .travel_time(DistrictId(1), DistrictId(2), &mut rng)
            .expect("travel");
        assert!((150..=450).contains(&t.0), "travel time {t:?} out of range");
        seen_low |= t.0 < 300;
        seen_high |= t.0 > 300;
    }
    assert!(seen_low && seen_high, "draws should spread around the base");
}

#[test]
fn redirect_blends_elapsed_leg_with_new_leg() {
    let travel = model();
    let mut rng = SimRng::seed_from_u64(11);
    // base(1,2) = 300, base(2,3) = 360, half traveled -> 330
    for _ in 0..200 {
        let t = travel
            .travel_time_redirect(DistrictId(1), DistrictId(2), DistrictId(3), 0.5, &mut rng)
            .expect("redirect");
        assert!((165..=495).contains(&t.0), "redirect time {t:?} out of range");
    }
}

#[test]
fn redirect_ratio_extremes_pick_one_leg() {
    let travel = model();
    let mut rng = SimRng::seed_from_u64(3);
    for _ in 0..100 {
        let all_old = travel
            .travel_time_redirect(DistrictId(1), DistrictId(2), DistrictId(3), 1.0, &mut rng)
            .expect("redirect");
        assert!((150..=450).contains(&all_old.0));

        let all_new = travel
            .travel_time_redirect(DistrictId(1), DistrictId(2), DistrictId(3), 0.0, &mut rng)
            .expect("redirect");
        assert!((180..=540).contains(&all_new.0));
    }
}

#[test]
fn zero_base_time_travels_instantly() {
    let map = DistrictMap::new(vec![1.0, 1.0], vec![vec![0.0, 2.0], vec![2.0, 0.0]])
        .expect("valid map");
    let travel = TravelModel::new(map);
    let mut rng = SimRng::seed_from_u64(1);
    assert_eq!(
        travel
            .travel_time(DistrictId(0), DistrictId(0), &mut rng)
            .expect("travel"),
        SimTime::ZERO
    );
}

#[test]
fn out_of_range_district_is_a_config_error() {
    let travel = model();
    let mut rng = SimRng::seed_from_u64(1);
    let err = travel
        .travel_time(DistrictId(10), DistrictId(0), &mut rng)
        .expect_err("district 10 does not exist");
    assert_eq!(
        err,
        ConfigError::DistrictOutOfRange {
            index: 10,
            districts: 10
        }
    );
    assert!(
        travel
            .travel_time_redirect(DistrictId(0), DistrictId(1), DistrictId(42), 0.5, &mut rng)
            .is_err()
    );
}

#[test]
fn district_map_rejects_bad_shapes_and_weights() {
    assert_eq!(
        DistrictMap::new(vec![], vec![]).expect_err("empty"),
        ConfigError::NoDistricts
    );
    assert_eq!(
        DistrictMap::new(vec![0.0, 0.0], vec![vec![1.0, 1.0], vec![1.0, 1.0]])
            .expect_err("all-zero weights"),
        ConfigError::InvalidPopulation
    );
    assert!(matches!(
        DistrictMap::new(vec![1.0, 1.0], vec![vec![1.0, 1.0], vec![1.0]]),
        Err(ConfigError::MatrixShape { row: 1, len: 1, .. })
    ));
    assert!(matches!(
        DistrictMap::new(vec![1.0, 1.0], vec![vec![1.0, 1.0]]),
        Err(ConfigError::MatrixRows { rows: 1, districts: 2 })
    ));
    assert!(matches!(
        DistrictMap::new(vec![1.0, 1.0], vec![vec![1.0, -3.0], vec![1.0, 1.0]]),
        Err(ConfigError::InvalidTravelTime { from: 0, to: 1, .. })
    ));
}

#[test]
fn district_id_checked_rejects_negative_and_large() {
    assert_eq!(DistrictId::checked(3, 10), Ok(DistrictId(3)));
    assert_eq!(
        DistrictId::checked(-1, 10),
        Err(ConfigError::DistrictOutOfRange {
            index: -1,
            districts: 10
        })
    );
    assert!(DistrictId::checked(10, 10).is_err());
}
