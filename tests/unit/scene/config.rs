use super::*;

const MINIMAL: &str = r##"{
    "canvas": { "width": 64, "height": 16 },
    "layers": [
        {
            "ratio": 0.5,
            "tile_width": 16,
            "unit": [
                { "kind": "rect", "rect": { "x0": 0, "y0": 0, "x1": 16, "y1": 8 }, "color": "#336699" }
            ]
        }
    ]
}"##;

fn sprite_layer() -> LayerSpec {
    let mut palette = BTreeMap::new();
    palette.insert('g', Rgba8::opaque(0, 200, 0));
    palette.insert('b', Rgba8::new(90, 60, 30, 128));
    LayerSpec {
        ratio: 1.0,
        tile_width: 4.0,
        repeat: Some(RepeaterConfig::new(3, -1)),
        placement: Transform2D {
            translate: crate::foundation::core::Vec2::new(0.0, 8.0),
            ..Transform2D::default()
        },
        unit: vec![UnitItem::Sprite {
            rows: vec!["gg..".into(), "bbbb".into()],
            palette,
            transform: Transform2D::default(),
        }],
    }
}

#[test]
fn minimal_scene_fills_defaults() {
    let spec = SceneSpec::from_json_str(MINIMAL).unwrap();
    assert_eq!(spec.background, Rgba8::TRANSPARENT);
    assert_eq!(spec.upscale, 1.0);
    assert_eq!(spec.snap, 0.0);
    assert_eq!(spec.anchor, 0.0);
    assert_eq!(spec.pixel_factor, None);
    assert_eq!(spec.layers[0].repeat, None);
    assert_eq!(spec.layers[0].placement, Transform2D::default());
    spec.validate().unwrap();
}

#[test]
fn missing_repeat_covers_canvas_with_margin() {
    let mut spec = SceneSpec::from_json_str(MINIMAL).unwrap();
    spec.upscale = 2.0;
    let scene = spec.build().unwrap();
    // 64px canvas, 16 * 2 = 32px period.
    assert_eq!(
        scene.parallax().layers()[0].repeater().config(),
        RepeaterConfig::new(4, -1)
    );
    assert_eq!(scene.parallax().state().upscale, 2.0);
}

#[test]
fn explicit_repeat_is_kept() {
    let spec = SceneSpec {
        canvas: Canvas {
            width: 32,
            height: 16,
        },
        background: Rgba8::opaque(10, 20, 30),
        upscale: 4.0,
        snap: 1.0,
        anchor: 1.0,
        pixel_factor: Some(4.0),
        layers: vec![sprite_layer()],
    };
    let scene = spec.build().unwrap();
    assert_eq!(scene.pixel_factor(), Some(4.0));
    let layer = &scene.parallax().layers()[0];
    assert_eq!(layer.repeater().config(), RepeaterConfig::new(3, -1));
    assert_eq!(layer.tile_width(), 4.0);
    assert_eq!(
        layer.placement(),
        crate::foundation::core::Affine::translate((0.0, 8.0))
    );
    assert_eq!(layer.repeater().unit().local_bounds(), Rect::new(0.0, 0.0, 4.0, 2.0));
}

#[test]
fn json_text_survives_a_write_and_read() {
    let spec = SceneSpec {
        canvas: Canvas {
            width: 8,
            height: 8,
        },
        background: Rgba8::new(1, 2, 3, 4),
        upscale: 2.75,
        snap: 0.5,
        anchor: 1.0,
        pixel_factor: None,
        layers: vec![sprite_layer()],
    };
    let text = spec.to_json_string().unwrap();
    assert!(text.contains("\"kind\": \"sprite\""));
    assert_eq!(SceneSpec::from_json_str(&text).unwrap(), spec);
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        SceneSpec::from_json_str("{ \"canvas\": "),
        Err(WavyteError::Serde(_))
    ));
    assert!(matches!(
        SceneSpec::from_json_str(r#"{"canvas":{"width":1,"height":1},"layers":[{"ratio":1,"tile_width":1,"unit":[{"kind":"circle"}]}]}"#),
        Err(WavyteError::Serde(_))
    ));
}

#[test]
fn bad_layers_are_rejected_with_their_index() {
    let mut spec = SceneSpec::from_json_str(MINIMAL).unwrap();
    spec.layers.push(spec.layers[0].clone());
    spec.layers[1].tile_width = 0.0;
    let err = spec.validate().unwrap_err();
    match err {
        WavyteError::Validation(msg) => {
            assert!(msg.starts_with("layer 1:"), "{msg}");
            assert!(msg.contains("tile_width"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(spec.build().is_err());

    let mut spec = SceneSpec::from_json_str(MINIMAL).unwrap();
    spec.layers[0].unit.push(UnitItem::Path {
        svg_path_d: "M0,0 X4,4".into(),
        color: Rgba8::opaque(0, 0, 0),
        transform: Transform2D::default(),
    });
    assert!(matches!(spec.validate(), Err(WavyteError::Validation(_))));
}

#[test]
fn bad_global_fields_are_rejected() {
    let base = SceneSpec::from_json_str(MINIMAL).unwrap();
    for spec in [
        SceneSpec {
            snap: 1.5,
            ..base.clone()
        },
        SceneSpec {
            upscale: 0.0,
            ..base.clone()
        },
        SceneSpec {
            anchor: f64::NAN,
            ..base.clone()
        },
        SceneSpec {
            pixel_factor: Some(-2.0),
            ..base.clone()
        },
    ] {
        assert!(matches!(spec.validate(), Err(WavyteError::Validation(_))));
    }
}

#[test]
fn pixel_factor_must_match_the_snap_grid() {
    let mut spec = SceneSpec::from_json_str(MINIMAL).unwrap();
    spec.upscale = 44.0 / 16.0;
    spec.pixel_factor = Some(2.0);
    match spec.validate() {
        Err(WavyteError::Validation(msg)) => assert!(msg.contains("pixel_factor"), "{msg}"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(spec.build().is_err());

    spec.pixel_factor = Some(44.0 / 16.0);
    spec.validate().unwrap();
    spec.pixel_factor = None;
    spec.validate().unwrap();
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let err = SceneSpec::from_path("/definitely/not/here/scene.json").unwrap_err();
    assert!(matches!(err, WavyteError::Other(_)));
    assert!(format!("{err:#}").contains("scene.json"));
}
