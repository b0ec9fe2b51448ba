//! End-to-end runs of the console against the dry-run uploader

use futures::StreamExt;
use std::sync::{Arc, Mutex};
use storage_console::{
    render, ConsoleConfig, DryRunUploader, SelectedFile, UploadOptions, UploadStatus,
    UploadStatusController, UploadType,
};
use tempfile::tempdir;

#[tokio::test(flavor = "multi_thread")]
async fn test_file_upload() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::try_init();

    let temp_dir = tempdir()?;
    let file_path = temp_dir.path().join("hello.txt");
    std::fs::write(&file_path, vec![b'x'; 10 * 1024])?;

    let config = ConsoleConfig::new().gateway_host("w3s.link").shard_size(4096);
    let uploader = DryRunUploader::new(config.shard_size as usize)?;

    let completed = Arc::new(Mutex::new(Vec::new()));
    let completed_clone = completed.clone();
    let mut controller = UploadStatusController::new(uploader).on_upload_complete(move |result| {
        completed_clone.lock().unwrap().push(result.clone());
    });

    let options = UploadOptions::for_type(UploadType::File);
    let file = SelectedFile::from_path(&file_path, options.allow_directory)?;
    controller.select_file(Some(file), options)?;

    let idle = render(&controller.view(), UploadType::File, &config);
    assert_eq!(idle[0], "[TEXT] hello.txt");
    assert_eq!(idle[1], "0.01 MiB");

    assert_eq!(controller.submit().await?, UploadStatus::Succeeded);

    let view = controller.view();
    assert_eq!(view.stored_dag_shards.len(), 3);
    let root = view.data_cid.expect("root cid").to_string();
    assert!(root.starts_with("bafy"));

    let lines = render(&view, UploadType::File, &config);
    assert_eq!(lines[0], "Uploaded");
    assert_eq!(lines[2], format!("https://{}.ipfs.w3s.link/", root));

    let completed = completed.lock().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].root_cid, root);
    assert_eq!(completed[0].size, 10 * 1024);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_upload() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let site = temp_dir.path().join("site");
    std::fs::create_dir_all(site.join("assets"))?;
    std::fs::write(site.join("index.html"), b"<h1>hi</h1>")?;
    std::fs::write(site.join("assets/app.js"), b"console.log(1)")?;

    let mut controller = UploadStatusController::new(DryRunUploader::new(1024)?);
    controller.set_upload_type(UploadType::Directory)?;
    let options = controller.options();
    assert!(options.allow_directory);

    let selection = SelectedFile::from_path(&site, options.allow_directory)?;
    assert!(selection.is_directory);
    controller.select_file(Some(selection), options)?;

    assert_eq!(controller.submit().await?, UploadStatus::Succeeded);
    assert_eq!(controller.view().stored_dag_shards.len(), 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_upload_keeps_stored_shards() -> Result<(), Box<dyn std::error::Error>> {
    let uploader = DryRunUploader::new(4)?.fail_after(2, "network timeout");
    let mut controller = UploadStatusController::new(uploader);
    controller.select_file(
        Some(SelectedFile::from_bytes("data.bin", "", vec![0u8; 20])),
        UploadOptions::default(),
    )?;

    assert_eq!(controller.submit().await?, UploadStatus::Failed);
    let view = controller.view();
    assert_eq!(view.stored_dag_shards.len(), 2);

    let lines = render(&view, UploadType::File, &ConsoleConfig::default());
    assert_eq!(
        lines,
        vec![
            "Error: failed to upload file: network timeout",
            "Check the logs for details."
        ]
    );

    controller.reset()?;
    assert_eq!(controller.status(), UploadStatus::Idle);
    assert!(controller.file().is_none());

    Ok(())
}

#[tokio::test]
async fn test_repeated_content_keeps_every_shard() -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = UploadStatusController::new(DryRunUploader::new(4)?);
    controller.select_file(
        Some(SelectedFile::from_bytes("zeros.bin", "", vec![0u8; 16])),
        UploadOptions::default(),
    )?;

    let mut events = controller.start()?;
    let mut in_flight = 0;
    while let Some(event) = events.next().await {
        controller.apply_event(event);
        if let Some(progress) = controller.view().upload_progress {
            in_flight = progress.len();
        }
    }
    controller.end_of_stream();

    assert_eq!(in_flight, 4);
    assert_eq!(controller.status(), UploadStatus::Succeeded);
    let view = controller.view();
    assert_eq!(view.stored_dag_shards.len(), 4);
    assert!(view.stored_dag_shards.iter().all(|s| s.size == 4));

    Ok(())
}

#[test]
fn test_submit_future_is_send() {
    fn assert_send<T: Send>(_: T) {}

    let mut controller = UploadStatusController::new(DryRunUploader::new(16).unwrap());
    controller
        .select_file(
            Some(SelectedFile::from_bytes("a.bin", "", vec![1, 2, 3])),
            UploadOptions::default(),
        )
        .unwrap();
    assert_send(controller.submit());
}

#[tokio::test]
async fn test_controller_in_spawned_task() -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = UploadStatusController::new(DryRunUploader::new(16)?);
    controller.select_file(
        Some(SelectedFile::from_bytes("a.bin", "", vec![1, 2, 3])),
        UploadOptions::default(),
    )?;

    let handle = tokio::spawn(async move {
        let status = controller.submit().await;
        (controller, status)
    });
    let (controller, status) = handle.await?;
    assert_eq!(status?, UploadStatus::Succeeded);
    assert!(controller.view().data_cid.is_some());

    Ok(())
}
