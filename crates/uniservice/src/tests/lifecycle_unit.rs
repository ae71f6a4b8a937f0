//! Unit tests for install, remove and control dispatch.

use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use rstest::rstest;

use crate::{
    InitFlavor, Service, ServiceConfigRecord, ServiceDescriptor, ServiceError, runlevel_links,
};

use super::support::{
    EXECUTABLE, HostRoot, MissingExecutable, RecordingHandler, RecordingRunner, SERVICE_NAME,
    descriptor, service,
};

fn expected_contents(flavor: InitFlavor) -> String {
    flavor.template().render(&ServiceConfigRecord {
        display: "My App".to_owned(),
        description: "Serves things".to_owned(),
        path: EXECUTABLE.to_owned(),
    })
}

#[rstest]
#[case(InitFlavor::Systemd, "/etc/systemd/system/myapp.service")]
#[case(InitFlavor::Upstart, "/etc/init/myapp.conf")]
#[case(InitFlavor::SystemV, "/etc/init.d/myapp")]
fn install_writes_rendered_template(#[case] flavor: InitFlavor, #[case] path: &str) {
    let root = HostRoot::for_flavor(flavor);
    let runner = RecordingRunner::default();
    let service = service(&root, flavor, &runner, &RecordingHandler::default());

    let report = service.install().expect("install should succeed");

    assert_eq!(report.config_path(), root.host(path));
    assert_eq!(service.installed_path(), root.host(path));
    let written = fs::read_to_string(root.host(path)).expect("control file readable");
    assert_eq!(written, expected_contents(flavor));
    assert!(report.link_warnings().is_empty());
}

#[rstest]
#[case(InitFlavor::Systemd)]
#[case(InitFlavor::Upstart)]
#[case(InitFlavor::SystemV)]
fn second_install_reports_already_installed(#[case] flavor: InitFlavor) {
    let root = HostRoot::for_flavor(flavor);
    let runner = RecordingRunner::default();
    let service = service(&root, flavor, &runner, &RecordingHandler::default());
    service.install().expect("first install should succeed");
    let commands_after_first = runner.commands();

    let error = service.install().expect_err("second install should fail");

    match error {
        ServiceError::AlreadyInstalled { path } => assert_eq!(path, service.installed_path()),
        other => panic!("expected AlreadyInstalled, got {other:?}"),
    }
    assert_eq!(runner.commands(), commands_after_first);
}

#[rstest]
#[case(InitFlavor::Systemd)]
#[case(InitFlavor::Upstart)]
#[case(InitFlavor::SystemV)]
fn install_remove_install_round_trips(#[case] flavor: InitFlavor) {
    let root = HostRoot::for_flavor(flavor);
    let runner = RecordingRunner::default();
    let service = service(&root, flavor, &runner, &RecordingHandler::default());

    service.install().expect("first install should succeed");
    let removed = service.remove().expect("remove should succeed");
    assert!(!removed.config_path().exists());
    let report = service.install().expect("reinstall should succeed");

    assert!(report.config_path().exists());
    assert!(report.link_warnings().is_empty());
}

#[test]
fn systemd_install_reloads_manager_configuration() {
    let root = HostRoot::for_flavor(InitFlavor::Systemd);
    let runner = RecordingRunner::default();
    let service = service(&root, InitFlavor::Systemd, &runner, &RecordingHandler::default());

    service.install().expect("install should succeed");

    assert_eq!(runner.commands(), ["systemctl daemon-reload"]);
}

#[test]
fn systemd_reload_failure_is_the_install_error() {
    let root = HostRoot::for_flavor(InitFlavor::Systemd);
    let runner = RecordingRunner::default();
    runner.fail_on("systemctl daemon-reload");
    let service = service(&root, InitFlavor::Systemd, &runner, &RecordingHandler::default());

    let error = service.install().expect_err("install should fail");

    assert!(matches!(error, ServiceError::Command(_)), "got {error:?}");
    assert!(error.to_string().contains("systemctl daemon-reload"));
}

#[rstest]
#[case(InitFlavor::Upstart)]
#[case(InitFlavor::SystemV)]
fn non_systemd_installs_run_no_commands(#[case] flavor: InitFlavor) {
    let root = HostRoot::for_flavor(flavor);
    let runner = RecordingRunner::default();
    let service = service(&root, flavor, &runner, &RecordingHandler::default());

    service.install().expect("install should succeed");

    assert!(runner.commands().is_empty());
}

#[test]
fn system_v_script_is_executable_and_linked_into_runlevels() {
    let root = HostRoot::for_flavor(InitFlavor::SystemV);
    let runner = RecordingRunner::default();
    let service = service(&root, InitFlavor::SystemV, &runner, &RecordingHandler::default());

    service.install().expect("install should succeed");

    let mode = fs::metadata(root.host("/etc/init.d/myapp"))
        .expect("script metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);

    let links = runlevel_links(SERVICE_NAME);
    assert_eq!(links.len(), 7);
    for link in links {
        let location = root.host(&link.path().to_string_lossy());
        let target = fs::read_link(&location).expect("runlevel link should exist");
        assert_eq!(target, Path::new("/etc/init.d/myapp"));
    }
}

#[test]
fn missing_runlevel_directory_does_not_abort_other_links() {
    let root = HostRoot::for_flavor(InitFlavor::SystemV);
    root.remove_dir("/etc/rc3.d");
    let runner = RecordingRunner::default();
    let service = service(&root, InitFlavor::SystemV, &runner, &RecordingHandler::default());

    let report = service.install().expect("install should still succeed");

    let warnings = report.link_warnings();
    assert_eq!(warnings.len(), 1);
    let warning = warnings.first().expect("one warning");
    assert_eq!(warning.link, root.host("/etc/rc3.d/S50myapp"));
    assert_eq!(warning.target, PathBuf::from("/etc/init.d/myapp"));
    for created in [
        "/etc/rc2.d/S50myapp",
        "/etc/rc4.d/S50myapp",
        "/etc/rc5.d/S50myapp",
        "/etc/rc0.d/K02myapp",
        "/etc/rc1.d/K02myapp",
        "/etc/rc6.d/K02myapp",
    ] {
        assert!(
            fs::symlink_metadata(root.host(created)).is_ok(),
            "{created} should have been linked"
        );
    }
}

#[test]
fn executable_lookup_failure_leaves_no_file() {
    let root = HostRoot::for_flavor(InitFlavor::Upstart);
    let service = Service::builder(descriptor(), RecordingHandler::default())
        .root(root.path())
        .flavor(InitFlavor::Upstart)
        .command_runner(RecordingRunner::default())
        .executable_locator(MissingExecutable)
        .build();

    let error = service.install().expect_err("install should fail");

    assert!(matches!(error, ServiceError::ExecutablePath { .. }), "got {error:?}");
    assert!(!root.host("/etc/init/myapp.conf").exists());
}

#[test]
fn missing_config_directory_reports_create_error() {
    let root = HostRoot::new();
    let runner = RecordingRunner::default();
    let service = service(&root, InitFlavor::Systemd, &runner, &RecordingHandler::default());

    let error = service.install().expect_err("install should fail");

    assert!(matches!(error, ServiceError::CreateConfig { .. }), "got {error:?}");
    assert!(runner.commands().is_empty());
}

#[test]
fn dangling_link_at_config_path_counts_as_installed() {
    let root = HostRoot::for_flavor(InitFlavor::Upstart);
    symlink("/nonexistent", root.host("/etc/init/myapp.conf")).expect("dangling link");
    let service = service(
        &root,
        InitFlavor::Upstart,
        &RecordingRunner::default(),
        &RecordingHandler::default(),
    );

    let error = service.install().expect_err("install should fail");

    assert!(matches!(error, ServiceError::AlreadyInstalled { .. }));
}

#[test]
fn systemd_remove_disables_before_deleting_and_ignores_disable_failure() {
    let root = HostRoot::for_flavor(InitFlavor::Systemd);
    let runner = RecordingRunner::default();
    let service = service(&root, InitFlavor::Systemd, &runner, &RecordingHandler::default());
    service.install().expect("install should succeed");
    runner.fail_on("systemctl disable myapp.service");

    service.remove().expect("remove should succeed");

    assert_eq!(
        runner.commands(),
        ["systemctl daemon-reload", "systemctl disable myapp.service"]
    );
    assert!(!root.host("/etc/systemd/system/myapp.service").exists());
}

#[rstest]
#[case(InitFlavor::Systemd)]
#[case(InitFlavor::Upstart)]
#[case(InitFlavor::SystemV)]
fn removing_a_missing_service_fails(#[case] flavor: InitFlavor) {
    let root = HostRoot::for_flavor(flavor);
    let runner = RecordingRunner::default();
    let service = service(&root, flavor, &runner, &RecordingHandler::default());

    let error = service.remove().expect_err("remove should fail");

    assert!(matches!(error, ServiceError::RemoveConfig { .. }), "got {error:?}");
}

#[test]
fn system_v_remove_deletes_only_links_to_the_script() {
    let root = HostRoot::for_flavor(InitFlavor::SystemV);
    let runner = RecordingRunner::default();
    let service = service(&root, InitFlavor::SystemV, &runner, &RecordingHandler::default());
    service.install().expect("install should succeed");
    let foreign = root.host("/etc/rc2.d/S50myapp");
    fs::remove_file(&foreign).expect("drop link");
    symlink("/etc/init.d/other", &foreign).expect("foreign link");

    let report = service.remove().expect("remove should succeed");

    assert!(report.link_warnings().is_empty());
    assert!(fs::symlink_metadata(&foreign).is_ok(), "foreign link should remain");
    for gone in ["/etc/rc3.d/S50myapp", "/etc/rc0.d/K02myapp", "/etc/rc6.d/K02myapp"] {
        assert!(fs::symlink_metadata(root.host(gone)).is_err(), "{gone} should be removed");
    }
}

#[rstest]
#[case(InitFlavor::Systemd, "systemctl start myapp.service", "systemctl stop myapp.service")]
#[case(InitFlavor::Upstart, "initctl start myapp", "initctl stop myapp")]
#[case(InitFlavor::SystemV, "service myapp start", "service myapp stop")]
fn start_and_stop_dispatch_to_the_init_tool(
    #[case] flavor: InitFlavor,
    #[case] start: &str,
    #[case] stop: &str,
) {
    let root = HostRoot::new();
    let runner = RecordingRunner::default();
    let service = service(&root, flavor, &runner, &RecordingHandler::default());

    service.start().expect("start should succeed");
    service.stop().expect("stop should succeed");

    assert_eq!(runner.commands(), [start, stop]);
}

#[test]
fn control_failures_propagate_verbatim() {
    let root = HostRoot::new();
    let runner = RecordingRunner::default();
    runner.fail_on("initctl start myapp");
    let service = service(&root, InitFlavor::Upstart, &runner, &RecordingHandler::default());

    let error = service.start().expect_err("start should fail");

    assert_eq!(
        error.to_string(),
        "'initctl start myapp' exited with status 1: simulated failure"
    );
}

#[test]
fn flavor_is_detected_from_the_root_when_not_supplied() {
    let root = HostRoot::new();
    root.mkdir("/run/systemd/system");
    let service = Service::builder(ServiceDescriptor::new("detected"), RecordingHandler::default())
        .root(root.path())
        .interactive(true)
        .build();

    assert_eq!(service.flavor(), InitFlavor::Systemd);
    assert_eq!(service.host_system().to_string(), "Linux systemd");
    assert_eq!(
        service.installed_path(),
        root.host("/etc/systemd/system/detected.service")
    );
}

#[test]
fn service_displays_its_label() {
    let root = HostRoot::new();
    let labelled = service(
        &root,
        InitFlavor::Upstart,
        &RecordingRunner::default(),
        &RecordingHandler::default(),
    );
    assert_eq!(labelled.to_string(), "My App");

    let bare = Service::builder(ServiceDescriptor::new("bare"), RecordingHandler::default())
        .root(root.path())
        .flavor(InitFlavor::Upstart)
        .build();
    assert_eq!(bare.to_string(), "bare");
}

#[test]
fn interactive_sessions_log_to_the_console() {
    let root = HostRoot::new();
    let service = Service::builder(descriptor(), RecordingHandler::default())
        .root(root.path())
        .flavor(InitFlavor::SystemV)
        .interactive(true)
        .build();

    assert!(service.interactive());
    let logger = service.logger().expect("console logger is always available");
    logger.info("hello from the test suite").expect("console write");
}
