// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-attributed reporting of recoverable errors.
//!
//! Recoverable misuse (adding a child twice, touching a destroyed node, and so
//! on) does not abort. The operation becomes a no-op, the error is returned,
//! and a `tracing` event is emitted on the [`TARGET`] target naming the source
//! location of the offending call. Public operations that can report carry
//! `#[track_caller]`, so the location is the user's call site rather than a
//! line inside this crate.

use core::fmt::Display;
use core::panic::Location;

use crate::error::TreeError;

/// `tracing` target for reported diagnostics.
pub const TARGET: &str = "arbor::diagnostics";

/// How serious a reported diagnostic is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Suspicious but harmless, e.g. an operation on a stale id.
    Warning,
    /// A contract violation that was ignored.
    Error,
}

/// Emit a diagnostic attributed to the caller's source location.
#[track_caller]
pub fn report(severity: Severity, message: &dyn Display) {
    let at = Location::caller();
    match severity {
        Severity::Warning => tracing::warn!(
            target: TARGET,
            file = at.file(),
            line = at.line(),
            column = at.column(),
            "{message}"
        ),
        Severity::Error => tracing::error!(
            target: TARGET,
            file = at.file(),
            line = at.line(),
            column = at.column(),
            "{message}"
        ),
    }
}

/// Report `result` if it is an error, then pass it through.
#[track_caller]
pub(crate) fn check<T>(result: Result<T, TreeError>) -> Result<T, TreeError> {
    if let Err(err) = &result {
        report(err.severity(), err);
    }
    result
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use crate::testing;
    use crate::types::NodeConfig;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn reports_name_the_calling_line() {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let line = tracing::subscriber::with_default(subscriber, || {
            let (mut scene, _platform, _fonts) = testing::scene();
            let root = scene.insert(None, NodeConfig::new("root")).unwrap();
            let child = scene.insert(Some(root), NodeConfig::new("child")).unwrap();
            let (result, line) = (scene.add_child(root, child), line!());
            assert!(result.is_err());
            line
        });

        let output = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        let report = output
            .lines()
            .find(|l| l.contains(super::TARGET))
            .unwrap_or_else(|| panic!("no diagnostic in {output:?}"));
        assert!(report.contains(file!()), "{report}");
        assert!(report.contains(&format!("line={line}")), "{report}");
    }
}
