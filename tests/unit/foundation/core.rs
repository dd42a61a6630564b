use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_at_boundaries() {
    let fps = Fps::whole(30);
    assert_eq!(fps.frame_at(Duration::ZERO), 0);
    assert_eq!(fps.frame_at(fps.frame_duration()), 1);
    assert_eq!(fps.frame_at(Duration::from_secs(5)), 150);
    assert!((fps.frames_to_secs(150) - 5.0).abs() < 1e-9);
}

#[test]
fn size_scaled_doubles_edges() {
    assert_eq!(Size::new(550, 688).scaled(2).unwrap(), Size::new(1100, 1376));
    assert!(Size::new(u32::MAX, 1).scaled(2).is_err());
}

#[test]
fn transparent_frame_rejects_empty_and_oversized_targets() {
    assert!(Frame::transparent(Size::new(0, 10)).is_err());
    assert!(Frame::transparent(Size::new(MAX_DIM + 1, 1)).is_err());
    let f = Frame::transparent(Size::new(2, 3)).unwrap();
    assert_eq!(f.data.len(), 24);
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn from_premul_checks_length() {
    assert!(Frame::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Frame::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn from_straight_premultiplies() {
    let f = Frame::from_straight(1, 1, vec![200, 100, 50, 128]).unwrap();
    assert_eq!(f.pixel(0, 0), Some([100, 50, 25, 128]));
    assert_eq!(f.pixel(1, 0), None);
}

#[test]
fn resized_keeps_solid_color() {
    let f = Frame::from_premul(2, 2, [10u8, 20, 30, 255].repeat(4)).unwrap();
    let r = f.resized(Size::new(4, 4)).unwrap();
    assert_eq!(r.size(), Size::new(4, 4));
    assert_eq!(r.pixel(3, 3), Some([10, 20, 30, 255]));
}

#[test]
fn encode_png_produces_png_signature() {
    let f = Frame::transparent(Size::new(4, 4)).unwrap();
    let png = f.encode_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 4));
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
}
