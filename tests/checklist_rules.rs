//! Checklist Rule Tests
//!
//! Tests for the checklist generator's observable contract:
//! - Station estimate: max(1, ceil(years / 2.5))
//! - Fixed categories always present; conditional ones only when populated
//! - One template instance per station, deployment and school
//! - Critical categories first; output identical for identical input

use chrono::NaiveDate;
use vetrecon::checklist::{
    deployment_template_len, estimated_station_count, generate_checklist, generate_for_intake,
    station_template_len, CategoryType, GeneratedCategory, Priority,
};
use vetrecon::period::DateRange;
use vetrecon::profile::{Branch, ProfileValidator, ServiceProfile};

// =============================================================================
// Test Utilities
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn profile(branch: Branch, years: i32, deployments: &[&str], schools: &[&str]) -> ServiceProfile {
    ServiceProfile {
        branch: Some(branch),
        service_period: Some(DateRange::new(date(2000, 1, 1), date(1999 + years, 12, 31))),
        primary_occupation: Some("11B".into()),
        secondary_occupation: None,
        deployments: deployments.iter().map(|d| d.to_string()).collect(),
        specialized_training: schools.iter().map(|s| s.to_string()).collect(),
    }
}

fn generate(profile: &ServiceProfile) -> Vec<GeneratedCategory> {
    generate_checklist(&ProfileValidator::validate(profile).unwrap())
}

fn category(checklist: &[GeneratedCategory], kind: CategoryType) -> Option<&GeneratedCategory> {
    checklist.iter().find(|c| c.category_type == kind)
}

// =============================================================================
// Station estimate
// =============================================================================

#[test]
fn test_station_estimate_examples() {
    assert_eq!(estimated_station_count(8.0), 4);
    assert_eq!(estimated_station_count(1.0), 1);
    assert_eq!(estimated_station_count(0.0), 1);
    assert_eq!(estimated_station_count(2.5), 1);
    assert_eq!(estimated_station_count(2.6), 2);
}

fn station_count(checklist: &[GeneratedCategory]) -> usize {
    category(checklist, CategoryType::DutyStations).unwrap().items.len() / station_template_len()
}

#[test]
fn test_whole_year_services_land_on_boundary() {
    // (first day, last day, expected stations)
    let cases = [
        (date(2000, 1, 1), date(2004, 12, 31), 2),
        (date(2000, 1, 1), date(2009, 12, 31), 4),
        (date(2001, 1, 1), date(2010, 12, 31), 4),
        (date(2000, 6, 15), date(2010, 6, 15), 4),
        (date(2000, 1, 1), date(2007, 12, 31), 4),
    ];
    for (start, end, expected) in cases {
        let mut p = profile(Branch::Army, 1, &[], &[]);
        p.service_period = Some(DateRange::new(start, end));
        let checklist = generate_for_intake(&p).unwrap();
        assert_eq!(station_count(&checklist), expected, "{} .. {}", start, end);
    }
}

#[test]
fn test_service_past_boundary_adds_station() {
    let mut p = profile(Branch::Army, 1, &[], &[]);
    p.service_period = Some(DateRange::new(date(2000, 1, 1), date(2005, 3, 1)));
    assert_eq!(station_count(&generate_for_intake(&p).unwrap()), 3);
}

// =============================================================================
// Category structure
// =============================================================================

/// Army, 8 active years, no schools, one deployment.
#[test]
fn test_army_eight_years_one_deployment() {
    let checklist = generate(&profile(Branch::Army, 8, &["OIF"], &[]));

    let fixed = checklist
        .iter()
        .filter(|c| c.category_type.is_fixed())
        .count();
    assert_eq!(fixed, 7);
    assert_eq!(checklist.len(), 9);

    let stations = category(&checklist, CategoryType::DutyStations).unwrap();
    assert_eq!(stations.items.len(), 4 * station_template_len());

    let deployments = category(&checklist, CategoryType::Deployments).unwrap();
    assert_eq!(deployments.items.len(), deployment_template_len());

    assert!(category(&checklist, CategoryType::SpecializedTraining).is_none());
}

#[test]
fn test_no_deployments_omits_category() {
    let checklist = generate(&profile(Branch::AirForce, 4, &[], &[]));
    assert!(category(&checklist, CategoryType::Deployments).is_none());
    assert_eq!(checklist.len(), 8);
}

#[test]
fn test_every_station_has_hazard_map_item() {
    let checklist = generate(&profile(Branch::Navy, 9, &[], &[]));
    let stations = category(&checklist, CategoryType::DutyStations).unwrap();

    let maps: Vec<_> = stations
        .items
        .iter()
        .filter(|i| i.document_name == "Hazard Exposure Map")
        .collect();
    assert_eq!(maps.len(), 4);
    assert!(maps.iter().all(|i| i.priority == Priority::Critical && i.required));

    let mut tags: Vec<_> = maps.iter().filter_map(|i| i.tag.clone()).collect();
    tags.dedup();
    assert_eq!(tags.len(), 4);
}

#[test]
fn test_schools_add_one_triplet_each() {
    let checklist = generate(&profile(Branch::Army, 6, &[], &["Airborne", "Ranger"]));
    let schools = category(&checklist, CategoryType::SpecializedTraining).unwrap();
    assert_eq!(schools.items.len(), 6);
    assert!(schools
        .items
        .iter()
        .any(|i| i.tag.as_deref() == Some("Ranger")));
}

// =============================================================================
// Ordering and determinism
// =============================================================================

#[test]
fn test_categories_sorted_by_priority_with_dense_positions() {
    let checklist = generate(&profile(Branch::MarineCorps, 12, &["OIF", "OEF"], &["Sniper"]));

    for pair in checklist.windows(2) {
        assert!(pair[0].priority.rank() <= pair[1].priority.rank());
    }
    for (index, category) in checklist.iter().enumerate() {
        assert_eq!(category.position as usize, index);
    }
}

#[test]
fn test_generation_is_deterministic() {
    let p = profile(Branch::CoastGuard, 7, &["OEF"], &["Rescue Swimmer"]);
    assert_eq!(generate(&p), generate(&p));
}

// =============================================================================
// Intake validation
// =============================================================================

#[test]
fn test_intake_rejects_reversed_period() {
    let mut p = profile(Branch::Army, 4, &[], &[]);
    p.service_period = Some(DateRange::new(date(2010, 1, 1), date(2005, 1, 1)));
    assert!(generate_for_intake(&p).is_err());
}

#[test]
fn test_intake_rejects_missing_period() {
    let mut p = profile(Branch::Army, 4, &[], &[]);
    p.service_period = None;
    let err = generate_for_intake(&p).unwrap_err();
    assert_eq!(err.field(), "service_period");
}
