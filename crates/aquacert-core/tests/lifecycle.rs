// Lifecycle and summary checks across whole collections
//
// These tests exercise the public API the way a listing view does:
// build a collection, move certificates between statuses, summarize.

use aquacert_core::{
    summarize, transition_status, transition_status_named, Certificate, CertificateError,
    CertificatePatch, CertificatePayload, CertificateStatus,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn certificate(client: &str, status: CertificateStatus, age_minutes: i64) -> Certificate {
    let created_at = Utc::now() - Duration::minutes(age_minutes);
    Certificate {
        id: Uuid::new_v4(),
        status,
        payload: CertificatePayload::new(client),
        version: 1,
        created_at,
        updated_at: created_at,
    }
}

/// Every sequence of statuses up to length `max_len`.
fn status_sequences(max_len: usize) -> Vec<Vec<CertificateStatus>> {
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for seq in &frontier {
            for status in CertificateStatus::ALL {
                let mut extended: Vec<CertificateStatus> = seq.clone();
                extended.push(status);
                next.push(extended);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

#[test]
fn test_counts_always_add_up_to_total() {
    let sequences = status_sequences(5);
    assert_eq!(sequences.len(), 1 + 3 + 9 + 27 + 81 + 243);

    for seq in sequences {
        let certificates: Vec<Certificate> = seq
            .iter()
            .enumerate()
            .map(|(i, status)| certificate("Client", *status, i as i64))
            .collect();

        let summary = summarize(&certificates);
        assert_eq!(summary.total, certificates.len() as u64);
        assert_eq!(
            summary.draft_count + summary.published_count + summary.archived_count,
            summary.total
        );
        for status in CertificateStatus::ALL {
            let expected = seq.iter().filter(|s| **s == status).count() as u64;
            assert_eq!(summary.count(status), expected);
        }
    }
}

#[test]
fn test_publishing_moves_one_count() {
    let mut certificates = vec![
        certificate("North Well", CertificateStatus::Draft, 3),
        certificate("South Well", CertificateStatus::Draft, 2),
        certificate("Plant Outlet", CertificateStatus::Published, 1),
    ];
    let before = summarize(&certificates);

    certificates[0] = transition_status(&certificates[0], CertificateStatus::Published);
    let after = summarize(&certificates);

    assert_eq!(after.total, before.total);
    assert_eq!(after.draft_count, before.draft_count - 1);
    assert_eq!(after.published_count, before.published_count + 1);
    assert_eq!(after.archived_count, before.archived_count);
}

#[test]
fn test_full_cycle_through_every_status() {
    let original = certificate("Sample A", CertificateStatus::Draft, 0);

    let published = transition_status_named(&original, "published").unwrap();
    let archived = transition_status_named(&published, "archived").unwrap();
    let reopened = transition_status_named(&archived, "draft").unwrap();

    assert!(published.is_published());
    assert!(archived.is_archived());
    assert_eq!(reopened, original);
}

#[test]
fn test_unknown_status_never_coerced() {
    let original = certificate("Sample A", CertificateStatus::Published, 0);
    for name in ["unknown", "deleted", "draft ", "", "publish"] {
        let result = transition_status_named(&original, name);
        if name.trim() == "draft" {
            // Whitespace is tolerated around a known name.
            assert!(result.unwrap().is_draft());
            continue;
        }
        assert!(matches!(result, Err(CertificateError::InvalidStatus(_))));
    }
}

#[test]
fn test_patch_with_invalid_payload_fails_validation() {
    let current = certificate("Sample A", CertificateStatus::Draft, 0);
    let patch = CertificatePatch {
        client_name: Some(String::new()),
        ..CertificatePatch::default()
    };

    let merged = patch.apply_to(&current);
    let err = merged.payload.validate().unwrap_err();
    assert!(matches!(err, CertificateError::Validation(_)));
    assert!(err.to_string().contains("clientName is required"));
}
