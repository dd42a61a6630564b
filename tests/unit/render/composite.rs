use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Frame {
    Frame::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [200, 200, 200, 200], 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let out = over([0, 0, 255, 255], [128, 0, 0, 128], 1.0);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 127);
}

#[test]
fn over_in_place_rejects_size_mismatch() {
    let mut dst = solid(2, 2, [0, 0, 0, 0]);
    let src = solid(3, 2, [0, 0, 0, 0]);
    assert!(over_in_place(&mut dst, &src, 1.0).is_err());
}

#[test]
fn draw_scaled_covers_whole_target() {
    let mut dst = solid(8, 6, [0, 0, 0, 0]);
    let src = solid(2, 2, [0, 255, 0, 255]);
    draw_scaled(&mut dst, &src).unwrap();
    for y in 0..6 {
        for x in 0..8 {
            assert_eq!(dst.pixel(x, y), Some([0, 255, 0, 255]));
        }
    }
}

#[test]
fn fill_premultiplies_color() {
    let mut dst = solid(1, 1, [0, 0, 0, 0]);
    fill(&mut dst, [255, 255, 255, 128]);
    assert_eq!(dst.pixel(0, 0), Some([128, 128, 128, 128]));
}

#[test]
fn flatten_forces_opaque_alpha() {
    let f = solid(1, 1, [50, 0, 0, 100]);
    assert_eq!(flatten_to_opaque(&f), vec![50, 0, 0, 255]);
}
