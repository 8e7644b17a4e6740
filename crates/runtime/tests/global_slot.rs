// Process-wide platform slot
// Runs as its own test binary: the slot can only be filled once per process,
// so everything that depends on ordering lives in a single test.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use tfplatform_core::domain::ValidationError;
use tfplatform_core::port::command_runner::mocks::MockCommandRunner;
use tfplatform_core::port::process_inspector::mocks::MockProcessInspector;
use tfplatform_core::{CommandContext, CommandError, DetectionSettings, Platform, PlatformError};

fn executable(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_slot_lifecycle() {
    // Before init
    assert!(!tfplatform_runtime::is_initialized());
    assert!(tfplatform_runtime::runtime().is_none());
    assert_eq!(tfplatform_runtime::get_platform(), Platform::Unknown);
    assert!(matches!(
        tfplatform_runtime::validate(),
        Err(PlatformError::Validation(ValidationError::NotInitialized))
    ));

    let ctx = CommandContext::background();
    let result = tfplatform_runtime::execute_command(Some(&ctx), &["plan"]).await;
    assert!(matches!(
        result,
        Err(PlatformError::Validation(ValidationError::NotInitialized))
    ));

    // First init wins
    let dir = tempfile::TempDir::new().unwrap();
    let dlv = executable(&dir, "dlv");
    let runner = Arc::new(MockCommandRunner::with_stdout("Terraform v1.5.0"));
    let first = tfplatform_runtime::init_with(
        Arc::new(MockProcessInspector::with_parent_executable(&dlv)),
        runner.clone(),
        DetectionSettings::default(),
    )
    .await;

    assert_eq!(first.platform(), Platform::DebugServer);
    assert_eq!(first.config().binary_path(), Some(dlv.as_path()));
    assert!(tfplatform_runtime::is_initialized());

    // A second init with different adapters changes nothing
    let terraform = executable(&dir, "terraform");
    let second = tfplatform_runtime::init_with(
        Arc::new(MockProcessInspector::with_parent_executable(&terraform)),
        Arc::new(MockCommandRunner::with_stdout("Terraform v1.5.0")),
        DetectionSettings::default(),
    )
    .await;

    assert!(std::ptr::eq(first, second));
    assert_eq!(second.platform(), Platform::DebugServer);

    // Reads are stable, including concurrent ones
    let readers: Vec<_> = (0..8)
        .map(|_| tokio::spawn(async { tfplatform_runtime::get_platform() }))
        .collect();
    for reader in readers {
        assert_eq!(reader.await.unwrap(), Platform::DebugServer);
    }
    assert_eq!(tfplatform_runtime::get_platform(), Platform::DebugServer);

    // Debug server config is valid but refuses to execute
    assert!(tfplatform_runtime::validate().is_ok());

    let result = tfplatform_runtime::execute_command(Some(&ctx), &["plan"]).await;
    assert!(matches!(
        result,
        Err(PlatformError::Command(CommandError::UnsupportedPlatform(
            Platform::DebugServer
        )))
    ));

    let result = first
        .executor()
        .execute_command(Some(&ctx), &["version"])
        .await;
    assert!(matches!(result, Err(CommandError::UnsupportedPlatform(_))));
    assert_eq!(runner.spawn_count(), 0);
}
