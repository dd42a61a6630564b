use super::*;

#[test]
fn mul_div255_edges() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = vec![200u8, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 25, 128]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px.iter().zip([200u8, 100, 50, 128]) {
        assert!(got.abs_diff(want) <= 2, "{got} vs {want}");
    }
}
