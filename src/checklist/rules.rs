//! Checklist rules
//!
//! Pure functions from a validated profile to an ordered category list.
//! No clock, no randomness, no I/O: the same profile always yields the same
//! checklist.

use crate::profile::{Branch, ProfileResult, ProfileValidator, ServiceProfile, ValidatedProfile};

use super::types::AcquisitionMethod::{AutoGenerated, SelfUpload, ThirdPartyRequest};
use super::types::{
    AcquisitionMethod, CategoryType, DocumentType, GeneratedCategory, ItemTemplate, Priority,
};

/// Average tour length used to estimate duty stations
pub const YEARS_PER_STATION: f64 = 2.5;

/// Records custodian for separated service members' files
const NPRC: &str = "National Personnel Records Center";

/// Estimated number of duty stations for a service length.
///
/// `max(1, ceil(years / 2.5))`; non-finite or non-positive lengths count as
/// one station.
pub fn estimated_station_count(active_years: f64) -> u32 {
    if !active_years.is_finite() || active_years <= 0.0 {
        return 1;
    }
    ((active_years / YEARS_PER_STATION).ceil() as u32).max(1)
}

/// Validate an intake profile and generate its checklist.
///
/// Fails before anything is generated when the profile is malformed.
pub fn generate_for_intake(profile: &ServiceProfile) -> ProfileResult<Vec<GeneratedCategory>> {
    let validated = ProfileValidator::validate(profile)?;
    Ok(generate_checklist(&validated))
}

/// Generate the ordered checklist for a validated profile.
///
/// Categories are stable-sorted by priority (critical first) over their
/// declaration order; `position` is the index after sorting.
pub fn generate_checklist(profile: &ValidatedProfile) -> Vec<GeneratedCategory> {
    let branch = profile.branch();
    let mut categories = vec![
        enlistment(),
        initial_training(branch),
        occupational_training(profile),
    ];

    if !profile.specialized_training().is_empty() {
        categories.push(specialized_training(profile.specialized_training()));
    }

    categories.push(duty_stations(
        branch,
        estimated_station_count(profile.active_years()),
    ));

    if !profile.deployments().is_empty() {
        categories.push(deployments(branch, profile.deployments()));
    }

    categories.push(medical(branch));
    categories.push(administrative(branch));
    categories.push(separation(branch));
    categories.push(hazard_map());

    categories.sort_by_key(|c| c.priority.rank());
    for (position, category) in categories.iter_mut().enumerate() {
        category.position = position as u32;
    }
    categories
}

struct Item {
    name: &'static str,
    doc: DocumentType,
    method: AcquisitionMethod,
    priority: Priority,
    required: bool,
}

const fn item(
    name: &'static str,
    doc: DocumentType,
    method: AcquisitionMethod,
    priority: Priority,
    required: bool,
) -> Item {
    Item {
        name,
        doc,
        method,
        priority,
        required,
    }
}

const ENLISTMENT_ITEMS: &[Item] = &[
    item(
        "Enlistment Contract (DD Form 4)",
        DocumentType::Contract,
        ThirdPartyRequest,
        Priority::High,
        true,
    ),
    item(
        "Oath of Enlistment",
        DocumentType::PersonnelRecord,
        ThirdPartyRequest,
        Priority::Medium,
        false,
    ),
    item(
        "MEPS Processing Record",
        DocumentType::PersonnelRecord,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
];

const INITIAL_TRAINING_ITEMS: &[Item] = &[
    item(
        "Basic Training Completion Certificate",
        DocumentType::Certificate,
        SelfUpload,
        Priority::Medium,
        true,
    ),
    item(
        "Basic Training Graduation Orders",
        DocumentType::Orders,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
];

const SCHOOL_ITEMS: &[Item] = &[
    item(
        "School Orders",
        DocumentType::Orders,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
    item(
        "Completion Certificate",
        DocumentType::Certificate,
        SelfUpload,
        Priority::Low,
        false,
    ),
    item(
        "Training Record",
        DocumentType::TrainingRecord,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
];

const STATION_ITEMS: &[Item] = &[
    item(
        "PCS Orders",
        DocumentType::Orders,
        ThirdPartyRequest,
        Priority::High,
        true,
    ),
    item(
        "Unit Roster",
        DocumentType::Roster,
        ThirdPartyRequest,
        Priority::Medium,
        false,
    ),
    item(
        "Morning Reports / Daily Status Records",
        DocumentType::StatusReport,
        ThirdPartyRequest,
        Priority::Medium,
        false,
    ),
    item(
        "Hazard Exposure Map",
        DocumentType::HazardMap,
        AutoGenerated,
        Priority::Critical,
        true,
    ),
];

const DEPLOYMENT_ITEMS: &[Item] = &[
    item(
        "Deployment Orders",
        DocumentType::Orders,
        ThirdPartyRequest,
        Priority::Critical,
        true,
    ),
    item(
        "After-Action Report",
        DocumentType::AfterActionReport,
        ThirdPartyRequest,
        Priority::High,
        false,
    ),
    item(
        "Pre-Deployment Health Assessment (DD Form 2795)",
        DocumentType::HealthAssessment,
        ThirdPartyRequest,
        Priority::High,
        true,
    ),
    item(
        "Post-Deployment Health Assessment (DD Form 2796)",
        DocumentType::HealthAssessment,
        ThirdPartyRequest,
        Priority::Critical,
        true,
    ),
    item(
        "Airborne Hazards and Open Burn Pit Registry Entry",
        DocumentType::RegistryEntry,
        SelfUpload,
        Priority::High,
        false,
    ),
];

const MEDICAL_ITEMS: &[Item] = &[
    item(
        "Service Treatment Records",
        DocumentType::MedicalRecord,
        ThirdPartyRequest,
        Priority::Critical,
        true,
    ),
    item(
        "Separation Physical Examination",
        DocumentType::MedicalRecord,
        ThirdPartyRequest,
        Priority::High,
        true,
    ),
    item(
        "Dental Records",
        DocumentType::MedicalRecord,
        ThirdPartyRequest,
        Priority::Medium,
        false,
    ),
    item(
        "Immunization Record",
        DocumentType::MedicalRecord,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
];

const ADMINISTRATIVE_ITEMS: &[Item] = &[
    item(
        "Official Military Personnel File",
        DocumentType::PersonnelRecord,
        ThirdPartyRequest,
        Priority::Medium,
        true,
    ),
    item(
        "Performance Evaluations",
        DocumentType::Evaluation,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
    item(
        "Awards and Decorations Orders",
        DocumentType::Award,
        ThirdPartyRequest,
        Priority::Low,
        false,
    ),
];

const SEPARATION_ITEMS: &[Item] = &[
    item(
        "Certificate of Release or Discharge (DD Form 214)",
        DocumentType::SeparationDocument,
        SelfUpload,
        Priority::Critical,
        true,
    ),
    item(
        "Separation Orders",
        DocumentType::Orders,
        ThirdPartyRequest,
        Priority::High,
        false,
    ),
];

const HAZARD_MAP_ITEMS: &[Item] = &[
    item(
        "Hazard Exposure Summary",
        DocumentType::HazardMap,
        AutoGenerated,
        Priority::High,
        true,
    ),
    item(
        "Occupational Hazard Summary",
        DocumentType::HazardMap,
        AutoGenerated,
        Priority::Medium,
        false,
    ),
];

fn source_for(method: AcquisitionMethod, custodian: &str) -> String {
    match method {
        SelfUpload => "Veteran's personal records".to_string(),
        ThirdPartyRequest => custodian.to_string(),
        AutoGenerated => "Generated from hazard matching".to_string(),
    }
}

fn expand(templates: &[Item], custodian: &str, tag: Option<&str>) -> Vec<ItemTemplate> {
    templates
        .iter()
        .map(|t| ItemTemplate {
            document_name: t.name.to_string(),
            document_type: t.doc,
            source: source_for(t.method, custodian),
            acquisition_method: t.method,
            priority: t.priority,
            required: t.required,
            tag: tag.map(str::to_string),
        })
        .collect()
}

fn category(
    category_type: CategoryType,
    name: impl Into<String>,
    priority: Priority,
    items: Vec<ItemTemplate>,
) -> GeneratedCategory {
    GeneratedCategory {
        category_type,
        name: name.into(),
        priority,
        position: 0,
        items,
    }
}

fn enlistment() -> GeneratedCategory {
    category(
        CategoryType::Enlistment,
        "Enlistment Records",
        Priority::High,
        expand(ENLISTMENT_ITEMS, NPRC, None),
    )
}

fn initial_training(branch: Branch) -> GeneratedCategory {
    category(
        CategoryType::InitialTraining,
        "Initial Training",
        Priority::Medium,
        expand(INITIAL_TRAINING_ITEMS, branch.records_custodian(), None),
    )
}

fn occupational_training(profile: &ValidatedProfile) -> GeneratedCategory {
    let branch = profile.branch();
    let label = branch.occupation_label();
    let custodian = branch.records_custodian();
    let occupational = |code: Option<&str>| {
        [
            ItemTemplate {
                document_name: format!("{} School Certificate", label),
                document_type: DocumentType::Certificate,
                source: source_for(SelfUpload, custodian),
                acquisition_method: SelfUpload,
                priority: Priority::Medium,
                required: true,
                tag: code.map(str::to_string),
            },
            ItemTemplate {
                document_name: format!("{} Training Record", label),
                document_type: DocumentType::TrainingRecord,
                source: source_for(ThirdPartyRequest, custodian),
                acquisition_method: ThirdPartyRequest,
                priority: Priority::Medium,
                required: false,
                tag: code.map(str::to_string),
            },
        ]
    };

    let mut items: Vec<ItemTemplate> = profile
        .occupations()
        .flat_map(|code| occupational(Some(code)))
        .collect();
    if items.is_empty() {
        items.extend(occupational(None));
    }

    category(
        CategoryType::OccupationalTraining,
        format!("Occupational Specialty Training ({})", label),
        Priority::Medium,
        items,
    )
}

fn specialized_training(schools: &[String]) -> GeneratedCategory {
    let items = schools
        .iter()
        .flat_map(|school| expand(SCHOOL_ITEMS, NPRC, Some(school.as_str())))
        .collect();
    category(
        CategoryType::SpecializedTraining,
        "Specialized Schools",
        Priority::Low,
        items,
    )
}

fn duty_stations(branch: Branch, count: u32) -> GeneratedCategory {
    let custodian = branch.records_custodian();
    let items = (1..=count)
        .flat_map(|n| {
            let tag = format!("Station {}", n);
            expand(STATION_ITEMS, custodian, Some(&tag))
        })
        .collect();
    category(
        CategoryType::DutyStations,
        "Duty Stations",
        Priority::High,
        items,
    )
}

fn deployments(branch: Branch, names: &[String]) -> GeneratedCategory {
    let custodian = branch.records_custodian();
    let items = names
        .iter()
        .flat_map(|name| expand(DEPLOYMENT_ITEMS, custodian, Some(name.as_str())))
        .collect();
    category(
        CategoryType::Deployments,
        "Deployments",
        Priority::Critical,
        items,
    )
}

fn medical(branch: Branch) -> GeneratedCategory {
    let custodian = if branch == Branch::CoastGuard {
        branch.records_custodian()
    } else {
        "VA Records Management Center"
    };
    category(
        CategoryType::Medical,
        "Medical Records",
        Priority::Critical,
        expand(MEDICAL_ITEMS, custodian, None),
    )
}

fn administrative(branch: Branch) -> GeneratedCategory {
    category(
        CategoryType::Administrative,
        "Administrative Records",
        Priority::Medium,
        expand(ADMINISTRATIVE_ITEMS, branch.records_custodian(), None),
    )
}

fn separation(branch: Branch) -> GeneratedCategory {
    category(
        CategoryType::Separation,
        "Separation Records",
        Priority::Critical,
        expand(SEPARATION_ITEMS, branch.records_custodian(), None),
    )
}

fn hazard_map() -> GeneratedCategory {
    category(
        CategoryType::HazardMap,
        "Geographic Hazard Map",
        Priority::High,
        expand(HAZARD_MAP_ITEMS, NPRC, None),
    )
}

/// Number of items one estimated duty station contributes
pub fn station_template_len() -> usize {
    STATION_ITEMS.len()
}

/// Number of items one deployment contributes
pub fn deployment_template_len() -> usize {
    DEPLOYMENT_ITEMS.len()
}
