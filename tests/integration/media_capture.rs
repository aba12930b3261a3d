use popthehood::media::{capture_photo, encode_batch, RawFile};
use popthehood::models::MediaKind;

use super::support::FakeCamera;

#[test]
fn batch_of_files_keeps_submission_order() {
    let files: Vec<RawFile> = (1..=8)
        .map(|i| RawFile {
            name: format!("clip-{i}"),
            mime_type: if i % 2 == 0 {
                "video/mp4".to_string()
            } else {
                "image/jpeg".to_string()
            },
            bytes: vec![i as u8; i],
        })
        .collect();
    let attachments = encode_batch(&files);
    assert_eq!(attachments.len(), 8);
    for (i, attachment) in attachments.iter().enumerate() {
        assert_eq!(attachment.name, format!("clip-{}", i + 1));
    }
}

#[test]
fn capture_yields_one_image_and_releases_the_stream() {
    let mut camera = FakeCamera::with_frame(vec![0xff, 0xd8, 0xff], "image/jpeg");
    let stopped = camera.stream_stopped.clone();

    let attachment = capture_photo(&mut camera, "tire.jpg").unwrap();
    assert_eq!(attachment.kind, MediaKind::Image);
    assert_eq!(attachment.mime_type, "image/jpeg");
    assert!(attachment.data.starts_with("data:image/jpeg;base64,"));
    assert!(stopped.get(), "stream must be stopped before capture returns");
}

#[test]
fn capture_failure_still_releases_the_stream() {
    let mut camera = FakeCamera::broken();
    let stopped = camera.stream_stopped.clone();

    assert!(capture_photo(&mut camera, "tire.jpg").is_err());
    assert!(stopped.get(), "stream must be stopped on the failure path too");
}
