mod common;

use common::helpers::{Recorded, RecordingBuildSystem, create_test_project};
use std::fs;
use ukv_build::env_vars::{CMAKE, CMAKE_BUILD_PARALLEL_LEVEL, PYTHON, UKV_DEBUG_PYTHON};
use ukv_build::extensions::{BuildStep, build_extensions};
use ukv_build::{
    BuildError, BuildMode, BuildPlan, ExtensionBuilder, Host, HostPlatform, MapEnv, PlanOptions,
};

const HOST: Host = Host {
    platform: HostPlatform::Linux,
    logical_cpus: 16,
};

fn env() -> MapEnv {
    MapEnv::new()
        .with(CMAKE, "cmake")
        .with(PYTHON, "/usr/bin/python3")
}

fn build_targets(calls: &[Recorded]) -> Vec<&str> {
    calls
        .iter()
        .filter_map(|call| match call {
            Recorded::Build { target, .. } => Some(target.as_str()),
            Recorded::Configure { .. } => None,
        })
        .collect()
}

#[test]
fn builds_all_extensions_in_declaration_order() {
    let project = create_test_project();
    let plan = BuildPlan::prepare(&env(), &HOST, project.path(), &PlanOptions::default()).unwrap();

    let mut builder =
        ExtensionBuilder::new(RecordingBuildSystem::default(), &plan.config, &plan.layout, false)
            .quiet(true);
    let outcomes = build_extensions(&mut builder, &plan.extensions).unwrap();
    let fake = builder.into_build_system();

    assert_eq!(outcomes.len(), 4);
    assert_eq!(
        build_targets(&fake.calls),
        ["py_umem", "py_rocksdb", "py_leveldb", "py_flight_client"]
    );

    // Every configure precedes the matching build
    for pair in fake.calls.chunks(2) {
        match pair {
            [
                Recorded::Configure { extension: a, .. },
                Recorded::Build { extension: b, .. },
            ] => assert_eq!(a, b),
            other => panic!("unexpected call sequence: {other:?}"),
        }
    }
}

#[test]
fn job_flag_matches_resolved_parallelism() {
    let project = create_test_project();
    let plan = BuildPlan::prepare(&env(), &HOST, project.path(), &PlanOptions::default()).unwrap();

    let mut builder =
        ExtensionBuilder::new(RecordingBuildSystem::default(), &plan.config, &plan.layout, false)
            .quiet(true);
    build_extensions(&mut builder, &plan.extensions).unwrap();
    let fake = builder.into_build_system();

    for call in &fake.calls {
        if let Recorded::Build { args, .. } = call {
            assert_eq!(args, &["-j8".to_string()]);
        }
    }
}

#[test]
fn explicit_parallel_level_removes_job_flag() {
    let project = create_test_project();
    let env = env().with(CMAKE_BUILD_PARALLEL_LEVEL, "3");
    let plan = BuildPlan::prepare(&env, &HOST, project.path(), &PlanOptions::default()).unwrap();

    let mut builder =
        ExtensionBuilder::new(RecordingBuildSystem::default(), &plan.config, &plan.layout, false)
            .quiet(true);
    build_extensions(&mut builder, &plan.extensions).unwrap();
    let fake = builder.into_build_system();

    assert!(fake.calls.iter().all(|call| match call {
        Recorded::Build { args, .. } => !args.iter().any(|a| a.starts_with("-j")),
        Recorded::Configure { .. } => true,
    }));
}

#[test]
fn configure_failure_aborts_remaining_extensions() {
    let project = create_test_project();
    let plan = BuildPlan::prepare(&env(), &HOST, project.path(), &PlanOptions::default()).unwrap();
    let fake = RecordingBuildSystem {
        fail_configure: Some("ukv.umem".to_string()),
        ..RecordingBuildSystem::default()
    };

    let mut builder = ExtensionBuilder::new(fake, &plan.config, &plan.layout, false).quiet(true);
    let err = build_extensions(&mut builder, &plan.extensions).unwrap_err();
    let fake = builder.into_build_system();

    assert!(matches!(
        err,
        BuildError::CommandFailed {
            step: BuildStep::Configure,
            ..
        }
    ));
    assert_eq!(fake.calls.len(), 1, "build step must never run: {:?}", fake.calls);
}

#[test]
fn build_failure_keeps_earlier_extensions() {
    let project = create_test_project();
    let plan = BuildPlan::prepare(&env(), &HOST, project.path(), &PlanOptions::default()).unwrap();
    let fake = RecordingBuildSystem {
        fail_build: Some("ukv.leveldb".to_string()),
        ..RecordingBuildSystem::default()
    };

    let mut builder = ExtensionBuilder::new(fake, &plan.config, &plan.layout, false).quiet(true);
    let err = build_extensions(&mut builder, &plan.extensions).unwrap_err();
    let fake = builder.into_build_system();

    assert_eq!(err.exit_code(), 2);
    assert_eq!(
        build_targets(&fake.calls),
        ["py_umem", "py_rocksdb", "py_leveldb"]
    );
}

#[test]
fn debug_short_circuit_places_full_tree() {
    let project = create_test_project();
    let env = env().with(UKV_DEBUG_PYTHON, "");
    let plan = BuildPlan::prepare(&env, &HOST, project.path(), &PlanOptions::default()).unwrap();
    assert!(plan.skip_native);

    let mut builder = ExtensionBuilder::new(
        RecordingBuildSystem::default(),
        &plan.config,
        &plan.layout,
        plan.skip_native,
    )
    .quiet(true);
    let outcomes = build_extensions(&mut builder, &plan.extensions).unwrap();
    let fake = builder.into_build_system();

    assert!(fake.calls.is_empty());
    assert!(outcomes.iter().all(|o| o.mode == BuildMode::CopiedPrebuilt));

    let placed = plan.layout.build_lib.join("ukv");
    assert_eq!(fs::read(placed.join("libukv_embedded_umem.so")).unwrap(), b"umem");
    assert_eq!(
        fs::read(placed.join("nested").join("libarrow.so")).unwrap(),
        b"arrow"
    );
}
