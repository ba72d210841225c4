use super::*;

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn transform_scale_pivots_around_anchor() {
    let t = Transform2D {
        scale: Vec2::new(2.0, 2.0),
        anchor: Vec2::new(4.0, 4.0),
        ..Transform2D::default()
    };
    let p = t.to_affine() * Point::new(4.0, 4.0);
    assert!((p.x - 4.0).abs() < 1e-12);
    assert!((p.y - 4.0).abs() < 1e-12);
}

#[test]
fn premultiply_scales_color_by_alpha() {
    assert_eq!(Rgba8::opaque(10, 20, 30).premultiplied(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::new(255, 255, 255, 0).premultiplied(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::new(200, 100, 0, 128).premultiplied(), [100, 50, 0, 128]);
}

#[test]
fn hex_colors_parse_and_print() {
    assert_eq!(Rgba8::from_hex("#ff8000").unwrap(), Rgba8::opaque(255, 128, 0));
    assert_eq!(
        Rgba8::from_hex("#00000080").unwrap(),
        Rgba8::new(0, 0, 0, 128)
    );
    assert!(Rgba8::from_hex("ff8000").is_err());
    assert!(Rgba8::from_hex("#ff80").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());

    let json = serde_json::to_string(&Rgba8::new(1, 2, 3, 4)).unwrap();
    assert_eq!(json, "\"#01020304\"");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgba8::new(1, 2, 3, 4));
}

#[test]
fn canvas_empty_when_any_dimension_is_zero() {
    assert!(Canvas { width: 0, height: 4 }.is_empty());
    assert!(Canvas { width: 4, height: 0 }.is_empty());
    assert!(!Canvas { width: 1, height: 1 }.is_empty());
}
