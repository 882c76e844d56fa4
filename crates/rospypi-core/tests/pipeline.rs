//! End-to-end run against a mock archive host.

mod common;

use std::fs;
use std::sync::Arc;

use common::{RecordingReporter, ResolvingGenerator, ScriptedFrontend, snapshot};
use rospypi_core::Pipeline;
use rospypi_core::catalog;
use rospypi_core::io::Fetcher;
use tempfile::TempDir;

const GOAL_STATUS: &str = "GoalID goal_id\nuint8 status\nuint8 PENDING=0\nstring text\n";

#[tokio::test]
async fn test_catalog_builds_in_requirement_order_and_indexes() {
    let mut server = mockito::Server::new_async().await;
    let std_msgs = server
        .mock("GET", "/ros/std_msgs/archive/0.5.12.zip")
        .with_status(200)
        .with_body(snapshot(
            "std_msgs-0.5.12",
            &[
                ("CMakeLists.txt", "project(std_msgs)\n"),
                ("msg/String.msg", "string data\n"),
            ],
        ))
        .expect(1)
        .create_async()
        .await;
    // Two catalog entries share this snapshot; it is downloaded once.
    let common_msgs = server
        .mock("GET", "/ros/common_msgs/archive/1.12.7.zip")
        .with_status(200)
        .with_body(snapshot(
            "common_msgs-1.12.7",
            &[
                ("actionlib_msgs/msg/GoalID.msg", "time stamp\nstring id\n"),
                ("actionlib_msgs/msg/GoalStatus.msg", GOAL_STATUS),
                ("demo_msgs/action/Count.action", "int32 target\n---\nint32 total\n---\nint32 current\n"),
                ("demo_msgs/srv/Reset.srv", "std_msgs/String reason\n---\nbool ok\n"),
                ("demo_msgs/package.xml", "<package/>\n"),
            ],
        ))
        .expect(1)
        .create_async()
        .await;
    let genpy = server
        .mock("GET", "/ros/genpy/archive/0.6.8.zip")
        .with_status(200)
        .with_body(snapshot(
            "genpy-0.6.8",
            &[
                ("setup.py", "from setuptools import setup\n"),
                ("src/genpy/__init__.py", ""),
            ],
        ))
        .expect(1)
        .create_async()
        .await;

    let local = TempDir::new().unwrap();
    let rospy3 = local.path().join("rospy3");
    fs::create_dir_all(&rospy3).unwrap();
    fs::write(rospy3.join("setup.py"), "from setuptools import setup\n").unwrap();
    let catalog_path = local.path().join("catalog.toml");
    // Declared dependents-first on purpose.
    fs::write(
        &catalog_path,
        r#"
        [[package]]
        source = "messages"
        repo = "ros/common_msgs"
        version = "1.12.7"
        subdir = "demo_msgs"
        requires = ["std_msgs", "actionlib_msgs"]

        [[package]]
        source = "messages"
        repo = "ros/common_msgs"
        version = "1.12.7"
        subdir = "actionlib_msgs"
        requires = ["std_msgs"]

        [[package]]
        source = "messages"
        repo = "ros/std_msgs"
        version = "0.5.12"

        [[package]]
        source = "archive"
        repo = "ros/genpy"
        version = "0.6.8"

        [[package]]
        source = "local"
        path = "rospy3"
        legacy_build = true
        "#,
    )
    .unwrap();
    let catalog = catalog::load(&catalog_path).unwrap();

    let ws = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let reporter = Arc::new(RecordingReporter::default());
    let pipeline = Pipeline::new(
        ws.path(),
        Fetcher::new(cache.path()).unwrap().with_base_url(server.url()),
        ResolvingGenerator,
        ScriptedFrontend,
        Arc::clone(&reporter),
    );

    let built = pipeline.run(&catalog).await.unwrap();

    let order: Vec<&str> = built.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        order,
        vec!["std_msgs", "actionlib_msgs", "demo_msgs", "genpy", "rospy3"]
    );
    std_msgs.assert_async().await;
    common_msgs.assert_async().await;
    genpy.assert_async().await;

    // message package layout
    let demo = ws.path().join("demo_msgs/demo_msgs");
    for generated in [
        "msg/_CountAction.py",
        "msg/_CountActionGoal.py",
        "msg/_CountActionResult.py",
        "msg/_CountActionFeedback.py",
        "msg/_CountGoal.py",
        "msg/_CountResult.py",
        "msg/_CountFeedback.py",
        "srv/_Reset.py",
        "srv/__init__.py",
        "__init__.py",
    ] {
        assert!(demo.join(generated).exists(), "missing {generated}");
    }
    assert!(!demo.join("package.xml").exists());
    assert_eq!(
        fs::read_to_string(demo.join("msg/CountGoal.msg")).unwrap(),
        "int32 target"
    );
    assert_eq!(
        fs::read_to_string(ws.path().join("demo_msgs/setup.py")).unwrap(),
        "from setuptools import find_packages, setup\n\
         setup(name='demo_msgs', version='1.12.7', packages=find_packages(),\n      \
         install_requires=['genpy'])"
    );

    // archive package extracted at the workspace root
    assert!(ws.path().join("genpy/src/genpy/__init__.py").exists());

    // legacy build failure is a warning, not an error
    let warnings = reporter.warnings.lock().unwrap().clone();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("rospy3: legacy wheel build failed"));
    assert_eq!(built[4].report.artifacts.len(), 2);

    let dest = TempDir::new().unwrap();
    let entries = pipeline.index(dest.path(), true, None).unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["actionlib-msgs", "demo-msgs", "genpy", "rospy3", "std-msgs"]
    );
    assert!(dest.path().join("demo-msgs/demo_msgs-1.0.tar.gz").exists());
    let root = fs::read_to_string(dest.path().join("index.html")).unwrap();
    assert!(root.contains("<a href=\"demo-msgs/\">demo_msgs</a><br>\n"));
    assert!(root.starts_with("<!DOCTYPE html><html><body>\n"));
    assert!(root.ends_with("</body></html>"));
}

#[tokio::test]
async fn test_unresolved_type_aborts_run() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/ros/common_msgs/archive/1.12.7.zip")
        .with_status(200)
        .with_body(snapshot(
            "common_msgs-1.12.7",
            &[("nav_msgs/msg/Path.msg", "geometry_msgs/PoseStamped[] poses\n")],
        ))
        .create_async()
        .await;

    let catalog = catalog::parse(
        r#"
        [[package]]
        source = "messages"
        repo = "ros/common_msgs"
        version = "1.12.7"
        subdir = "nav_msgs"
        "#,
    )
    .unwrap();

    let ws = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let pipeline = Pipeline::new(
        ws.path(),
        Fetcher::new(cache.path()).unwrap().with_base_url(server.url()),
        ResolvingGenerator,
        ScriptedFrontend,
        rospypi_core::NullReporter,
    );

    let err = pipeline.run(&catalog).await.unwrap_err();

    assert!(matches!(
        err,
        rospypi_core::Error::Schema(rospypi_core::error::SchemaError::Generation { .. })
    ));
    assert!(!ws.path().join("nav_msgs/dist").exists());
}
