// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::notify::FakeNotifyAdapter;
use crate::stats::FakeStatsAdapter;
use chores_core::StatKind;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a future with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn approval() -> StatsRecord {
    StatsRecord {
        kid_id: KidId::from("ada"),
        chore_id: ChoreId::from("dishes"),
        kind: StatKind::Approved,
        points: 4.0,
        at: Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 0).unwrap(),
    }
}

#[test]
fn traced_stats_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedStatsAdapter::new(FakeStatsAdapter::new());
        traced.record(&approval()).await
    });

    assert!(result.is_ok());
    assert!(logs.contains("stats.record"), "Logs:\n{}", logs);
    assert!(logs.contains("dishes"), "Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Logs:\n{}", logs);
}

#[test]
fn traced_stats_warns_on_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeStatsAdapter::new();
        fake.set_failing(true);
        TracedStatsAdapter::new(fake).record(&approval()).await
    });

    assert!(result.is_err());
    assert!(logs.contains("record failed"), "Logs:\n{}", logs);
}

#[tokio::test]
async fn traced_wrappers_delegate() {
    let fake = FakeNotifyAdapter::new();
    let traced = TracedNotifyAdapter::new(fake.clone());
    let event = Event::RotationCycleOpened {
        chore_id: ChoreId::from("trash"),
        chore_name: "Trash".to_string(),
        update_stats: false,
    };

    traced.notify(&event).await.unwrap();

    assert_eq!(fake.events(), vec![event]);
}
