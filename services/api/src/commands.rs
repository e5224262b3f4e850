use crate::infra::{apply_overrides, build_registry, build_risk_service};
use clap::Args;
use maternal_guard::config::AppConfig;
use maternal_guard::error::AppError;
use maternal_guard::workflows::donors::{
    BloodGroup, DonorRecord, DonorRegistration, Eligibility, Gender, MatchQuery,
};
use maternal_guard::workflows::risk::{RiskAssessment, RiskAssessmentRequest, VitalsInput};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Patient name used in the SOS alert
    #[arg(long, default_value = "")]
    pub(crate) patient_name: String,
    /// Age in years (15-50)
    #[arg(long)]
    pub(crate) age: i64,
    /// Systolic blood pressure in mmHg (80-200)
    #[arg(long)]
    pub(crate) systolic_bp: i64,
    /// Diastolic blood pressure in mmHg (50-130)
    #[arg(long)]
    pub(crate) diastolic_bp: i64,
    /// Heart rate in beats per minute (40-180)
    #[arg(long)]
    pub(crate) heart_rate: i64,
    /// Blood oxygen saturation in percent (70-100)
    #[arg(long)]
    pub(crate) oxygen_level: i64,
    /// Body temperature in degrees Celsius (35.0-42.0)
    #[arg(long)]
    pub(crate) temperature: f64,
    /// Send the SOS email when the result is high risk
    #[arg(long)]
    pub(crate) notify: bool,
    /// Override the configured risk model artifact
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StorageArgs {
    /// Override the configured donor CSV path
    #[arg(long)]
    pub(crate) donor_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AddDonorArgs {
    #[arg(long)]
    pub(crate) donor_id: i64,
    /// Donor age in years (18-65)
    #[arg(long)]
    pub(crate) age: i64,
    /// Male or Female
    #[arg(long)]
    pub(crate) gender: Gender,
    /// One of A+, A-, B+, B-, AB+, AB-, O+, O-
    #[arg(long)]
    pub(crate) blood_group: BloodGroup,
    #[arg(long)]
    pub(crate) city: String,
    /// Yes or No
    #[arg(long)]
    pub(crate) eligible: Eligibility,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

#[derive(Args, Debug)]
pub(crate) struct MatchDonorArgs {
    /// Patient blood group
    #[arg(long)]
    pub(crate) blood_group: BloodGroup,
    /// Patient city; compared case-insensitively
    #[arg(long)]
    pub(crate) city: String,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

pub(crate) fn run_assess(mut config: AppConfig, args: AssessArgs) -> Result<(), AppError> {
    apply_overrides(&mut config, None, args.model);
    let service = build_risk_service(&config)?;

    let request = RiskAssessmentRequest {
        patient_name: args.patient_name,
        vitals: VitalsInput {
            age: args.age,
            systolic_bp: args.systolic_bp,
            diastolic_bp: args.diastolic_bp,
            heart_rate: args.heart_rate,
            oxygen_level: args.oxygen_level,
            temperature: args.temperature,
        },
        notify: args.notify,
    };

    let assessment = service.assess(request)?;
    render_assessment(&assessment);
    Ok(())
}

pub(crate) fn run_donor_add(mut config: AppConfig, args: AddDonorArgs) -> Result<(), AppError> {
    apply_overrides(&mut config, args.storage.donor_csv, None);
    let registry = build_registry(&config);

    let record = registry.register(DonorRegistration {
        donor_id: args.donor_id,
        age: args.age,
        gender: args.gender,
        blood_group: args.blood_group,
        city: args.city,
        eligible: args.eligible,
    })?;

    println!("Donor registered successfully");
    render_donor_table(std::slice::from_ref(&record));
    Ok(())
}

pub(crate) fn run_donor_list(mut config: AppConfig, args: StorageArgs) -> Result<(), AppError> {
    apply_overrides(&mut config, args.donor_csv, None);
    let registry = build_registry(&config);

    let listing = registry.list()?;
    if !listing.storage_initialized {
        println!(
            "No donor data found at {}",
            config.storage.donor_csv.display()
        );
        return Ok(());
    }

    println!("Registered donors: {}", listing.donors.len());
    render_donor_table(listing.donors.records());
    Ok(())
}

pub(crate) fn run_donor_match(mut config: AppConfig, args: MatchDonorArgs) -> Result<(), AppError> {
    apply_overrides(&mut config, args.storage.donor_csv, None);
    let registry = build_registry(&config);

    let query = MatchQuery {
        blood_group: args.blood_group,
        city: args.city,
    };
    let result = registry.find_matches(&query)?;

    if !result.storage_initialized {
        println!(
            "No donor data found at {}",
            config.storage.donor_csv.display()
        );
        return Ok(());
    }
    if result.matches.is_empty() {
        println!(
            "No matching donors found for {} in {}",
            query.blood_group, query.city
        );
        return Ok(());
    }

    println!("Matching donors: {}", result.matches.len());
    render_donor_table(result.matches.records());
    Ok(())
}

fn render_assessment(assessment: &RiskAssessment) {
    let patient = if assessment.patient_name.is_empty() {
        "(unnamed)"
    } else {
        assessment.patient_name.as_str()
    };
    println!("Patient: {patient}");
    println!("Predicted risk: {}", assessment.label);

    if assessment.sos_required {
        println!("SOS: emergency response recommended");
    }

    match &assessment.notification {
        Some(outcome) if outcome.sent => println!("SOS alert sent"),
        Some(outcome) => println!(
            "SOS alert not sent: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
        None => {}
    }
}

fn render_donor_table(records: &[DonorRecord]) {
    println!(
        "{:<10} {:<5} {:<8} {:<12} {:<20} {:<8}",
        "Donor_ID", "Age", "Gender", "Blood_Group", "City", "Eligible"
    );
    for record in records {
        println!(
            "{:<10} {:<5} {:<8} {:<12} {:<20} {:<8}",
            record.donor_id,
            record.age,
            record.gender,
            record.blood_group,
            record.city,
            record.eligible
        );
    }
}
