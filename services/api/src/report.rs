use crate::infra::{file_repository, parse_month};
use clap::Args;
use job_tracker::applications::{
    ApplicationId, ApplicationRecord, ApplicationService, YearMonth,
};
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Only show applications received in this month (YYYY-MM). Defaults to the current month.
    #[arg(long, value_parser = parse_month, conflicts_with = "all")]
    pub(crate) month: Option<YearMonth>,
    /// Show every application regardless of when it was received
    #[arg(long)]
    pub(crate) all: bool,
    /// Override the JSON document holding the applications
    #[arg(long)]
    pub(crate) data_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Identifier of the application to print
    pub(crate) id: String,
    /// Override the JSON document holding the applications
    #[arg(long)]
    pub(crate) data_file: Option<PathBuf>,
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let ListArgs {
        month,
        all,
        data_file,
    } = args;

    let config = AppConfig::load()?;
    let service = ApplicationService::new(Arc::new(file_repository(&config, data_file)));

    let filter = if all {
        None
    } else {
        Some(month.unwrap_or_else(YearMonth::current))
    };
    let records = service.list(filter)?;

    print!("{}", render_list(filter, &records));
    Ok(())
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = ApplicationService::new(Arc::new(file_repository(&config, args.data_file)));

    let record = service.get(&ApplicationId(args.id))?;
    print!("{}", render_record(&record));
    Ok(())
}

pub(crate) fn render_list(filter: Option<YearMonth>, records: &[ApplicationRecord]) -> String {
    let mut out = String::new();
    match filter {
        Some(month) => {
            let _ = writeln!(out, "Applications received in {month} ({})", records.len());
        }
        None => {
            let _ = writeln!(out, "All applications ({})", records.len());
        }
    }

    if records.is_empty() {
        out.push_str("- none\n");
        return out;
    }

    for record in records {
        let _ = writeln!(
            out,
            "- [{}] {} | {} | {} | received {}",
            record.id,
            record.company,
            record.role,
            record.status_label(),
            record.date_received
        );
    }
    out
}

pub(crate) fn render_record(record: &ApplicationRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {} (#{})", record.company, record.role, record.id);
    let _ = writeln!(out, "Status: {}", record.status_label());
    let _ = writeln!(out, "Callback received: {}", record.date_received);

    let optional = [
        ("Current stage", &record.current_stage),
        ("Interview process", &record.interview_process),
        ("Culture", &record.culture),
        ("Mission", &record.mission),
        ("Notes", &record.notes),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{label}: {value}");
        }
    }

    if let Some(values) = record.values.as_ref().filter(|values| !values.is_empty()) {
        let _ = writeln!(out, "Values: {}", values.join(", "));
    }

    let _ = writeln!(out, "\nJob description\n{}", record.job_description);

    if let Some(prep) = record.prep_questions.as_ref().filter(|prep| !prep.is_empty()) {
        out.push_str("\nPrep questions\n");
        for (question, answer) in prep {
            let _ = writeln!(out, "- Q: {question}\n  A: {answer}");
        }
    }

    if let Some(questions) = record
        .interview_questions
        .as_ref()
        .filter(|questions| !questions.is_empty())
    {
        out.push_str("\nInterview questions\n");
        for question in questions {
            let context: Vec<&str> = [question.round.as_deref(), question.date.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if context.is_empty() {
                let _ = writeln!(out, "- {}", question.question);
            } else {
                let _ = writeln!(out, "- {} ({})", question.question, context.join(", "));
            }
            if let Some(answer) = &question.my_answer {
                let _ = writeln!(out, "  My answer: {answer}");
            }
        }
    }

    if !record.extra.is_empty() {
        out.push_str("\nOther fields\n");
        for (key, value) in &record.extra {
            let _ = writeln!(out, "- {key}: {value}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_tracker::applications::{ApplicationStatus, InterviewQuestion};
    use serde_json::json;

    fn record() -> ApplicationRecord {
        serde_json::from_value(json!({
            "id": "3",
            "dateReceived": "2024-03-04",
            "company": "Acme",
            "role": "Engineer",
            "jobDescription": "Build things"
        }))
        .expect("record decodes")
    }

    #[test]
    fn list_shows_status_label_per_record() {
        let mut ongoing = record();
        ongoing.status = Some(ApplicationStatus::Ongoing);
        let month = YearMonth::new(2024, 3);

        let rendered = render_list(month, &[record(), ongoing]);

        assert!(rendered.starts_with("Applications received in 2024-03 (2)"));
        assert!(rendered.contains("- [3] Acme | Engineer | No Status | received 2024-03-04"));
        assert!(rendered.contains("| Ongoing |"));
    }

    #[test]
    fn empty_list_says_none() {
        let rendered = render_list(None, &[]);
        assert_eq!(rendered, "All applications (0)\n- none\n");
    }

    #[test]
    fn record_view_includes_questions_and_extra_fields() {
        let mut detailed = record();
        detailed.notes = Some("Follow up Monday".to_string());
        detailed.interview_questions = Some(vec![InterviewQuestion {
            question: "Design a rate limiter".to_string(),
            my_answer: Some("Token bucket".to_string()),
            round: Some("Onsite".to_string()),
            date: None,
        }]);
        detailed.extra.insert("referral".to_string(), json!("Dana"));

        let rendered = render_record(&detailed);

        assert!(rendered.starts_with("Acme - Engineer (#3)"));
        assert!(rendered.contains("Notes: Follow up Monday"));
        assert!(rendered.contains("- Design a rate limiter (Onsite)"));
        assert!(rendered.contains("  My answer: Token bucket"));
        assert!(rendered.contains("- referral: \"Dana\""));
    }
}
