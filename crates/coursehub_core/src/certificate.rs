//! crates/coursehub_core/src/certificate.rs
//!
//! Certificate issuance. Every certificate gets a public identifier computed at issue
//! time, which is what students share and what verification looks up.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Certificate, Course};

/// Builds the public identifier, e.g. `CERT-20240115-9F86D081`.
pub fn certificate_id(issued_at: DateTime<Utc>, seed: Uuid) -> String {
    let suffix = seed.simple().to_string()[..8].to_uppercase();
    format!("CERT-{}-{}", issued_at.format("%Y%m%d"), suffix)
}

/// Issues a new, not yet persisted, certificate for `student_name` on `course`.
pub fn issue_certificate(student_name: &str, course: &Course) -> Certificate {
    let id = Uuid::new_v4();
    let issued_at = Utc::now();
    Certificate {
        id,
        certificate_id: certificate_id(issued_at, id),
        student_name: student_name.trim().to_string(),
        course_id: course.id,
        course_title: course.title.clone(),
        issued_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_certificate_id_format() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let seed = Uuid::parse_str("9f86d081-884c-4d63-9a2f-5f3a2b6c7d8e").unwrap();
        assert_eq!(certificate_id(issued_at, seed), "CERT-20240115-9F86D081");
    }

    #[test]
    fn test_issue_copies_course_and_trims_name() {
        let course = Course {
            id: Uuid::new_v4(),
            title: "Intro to Rust".to_string(),
            description: String::new(),
            instructor: None,
            created_at: Utc::now(),
        };

        let certificate = issue_certificate("  Ada Lovelace ", &course);

        assert_eq!(certificate.student_name, "Ada Lovelace");
        assert_eq!(certificate.course_id, course.id);
        assert_eq!(certificate.course_title, "Intro to Rust");
        assert!(certificate.certificate_id.starts_with("CERT-"));
        assert_eq!(certificate.certificate_id.len(), "CERT-YYYYMMDD-XXXXXXXX".len());
    }

    #[test]
    fn test_ids_differ_between_certificates() {
        let course = Course {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            description: String::new(),
            instructor: None,
            created_at: Utc::now(),
        };
        let first = issue_certificate("A", &course);
        let second = issue_certificate("A", &course);
        assert_ne!(first.certificate_id, second.certificate_id);
    }
}
