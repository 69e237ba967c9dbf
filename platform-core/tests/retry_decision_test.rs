//! Retry decision table tests.
//!
//! Walks every failure kind through every attempt count with and without an
//! idempotent request.

use platform_core::error::{Error, NetworkError};
use platform_core::retry_strategy::{FailureKind, RetryConfig, RetryStrategy};

const ALL_KINDS: [FailureKind; 7] = [
    FailureKind::NoResponse,
    FailureKind::TlsHandshake,
    FailureKind::Timeout,
    FailureKind::UnknownHost,
    FailureKind::ConnectTimeout,
    FailureKind::Tls,
    FailureKind::Io,
];

fn expected(kind: FailureKind, idempotent: bool) -> bool {
    match kind {
        FailureKind::NoResponse | FailureKind::UnknownHost => true,
        FailureKind::TlsHandshake
        | FailureKind::Timeout
        | FailureKind::ConnectTimeout
        | FailureKind::Tls => false,
        FailureKind::Io => idempotent,
    }
}

#[test]
fn test_full_decision_table_below_limit() {
    let strategy = RetryStrategy::default_strategy();
    for kind in ALL_KINDS {
        for attempt in 1..5 {
            for idempotent in [true, false] {
                assert_eq!(
                    strategy.should_retry(kind, attempt, idempotent),
                    expected(kind, idempotent),
                    "kind={kind} attempt={attempt} idempotent={idempotent}"
                );
            }
        }
    }
}

#[test]
fn test_limit_overrides_every_kind() {
    let strategy = RetryStrategy::default_strategy();
    for kind in ALL_KINDS {
        for attempt in [5, 6, 100] {
            assert!(!strategy.should_retry(kind, attempt, true), "kind={kind}");
            assert!(!strategy.should_retry(kind, attempt, false), "kind={kind}");
        }
    }
}

#[test]
fn test_custom_limit() {
    let strategy = RetryStrategy::new(RetryConfig {
        max_attempts: 2,
        ..Default::default()
    });
    assert!(strategy.should_retry(FailureKind::NoResponse, 1, false));
    assert!(!strategy.should_retry(FailureKind::NoResponse, 2, false));

    let never = RetryStrategy::new(RetryConfig::no_retry());
    assert!(!never.should_retry(FailureKind::UnknownHost, 1, true));
}

#[test]
fn test_error_decisions_follow_network_kind() {
    let strategy = RetryStrategy::default_strategy();

    let dns = Error::from(NetworkError::DnsResolution("gateway.invalid".into()));
    assert!(strategy.should_retry_error(&dns, 1, false));

    let read_timeout = Error::from(NetworkError::Timeout);
    assert!(!strategy.should_retry_error(&read_timeout, 1, true));

    let reset = Error::from(NetworkError::ConnectionFailed("reset by peer".into()));
    assert!(strategy.should_retry_error(&reset, 1, true));
    assert!(!strategy.should_retry_error(&reset, 1, false));
}

#[test]
fn test_non_transport_errors_never_retry() {
    let strategy = RetryStrategy::default_strategy();
    for err in [
        Error::authentication("bad sign"),
        Error::invalid_request("bad url"),
        Error::timeout("call deadline"),
        Error::resource_exhausted("pool saturated"),
        Error::cancelled("shutdown"),
    ] {
        assert!(!strategy.should_retry_error(&err, 1, true), "{err}");
    }
}

#[test]
fn test_context_keeps_failure_kind() {
    let strategy = RetryStrategy::default_strategy();
    let err = Error::from(NetworkError::NoResponse("eof".into())).context("gateway call");

    assert_eq!(err.failure_kind(), Some(FailureKind::NoResponse));
    assert!(strategy.should_retry_error(&err, 3, false));
}
