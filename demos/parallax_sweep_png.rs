use std::collections::BTreeMap;
use std::path::PathBuf;

use wavyte_parallax::{
    Canvas, LayerSpec, Rect, Rgba8, SceneSpec, Transform2D, UnitItem, Vec2, camera_sweep,
};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba8) -> UnitItem {
    UnitItem::Rect {
        rect: Rect::new(x0, y0, x1, y1),
        color,
        transform: Transform2D::default(),
    }
}

fn at_y(y: f64) -> Transform2D {
    Transform2D {
        translate: Vec2::new(0.0, y),
        ..Transform2D::default()
    }
}

fn scene() -> SceneSpec {
    let upscale = 44.0 / 16.0;
    let mut palette = BTreeMap::new();
    palette.insert('w', Rgba8::opaque(120, 84, 52));
    palette.insert('d', Rgba8::opaque(84, 56, 36));

    SceneSpec {
        canvas: Canvas {
            width: 352,
            height: 176,
        },
        background: Rgba8::opaque(150, 200, 235),
        upscale,
        snap: 1.0,
        anchor: 1.0,
        pixel_factor: Some(upscale),
        layers: vec![
            LayerSpec {
                ratio: 0.3,
                tile_width: 16.0,
                repeat: None,
                placement: at_y(44.0),
                unit: vec![UnitItem::Path {
                    svg_path_d: "M0,16 L5,4 L8,9 L11,2 L16,16 Z".into(),
                    color: Rgba8::opaque(96, 110, 150),
                    transform: Transform2D::default(),
                }],
            },
            LayerSpec {
                ratio: 0.7,
                tile_width: 16.0,
                repeat: None,
                placement: at_y(88.0),
                unit: vec![UnitItem::Path {
                    svg_path_d: "M0,12 Q4,4 8,8 Q12,12 16,6 L16,16 L0,16 Z".into(),
                    color: Rgba8::opaque(70, 130, 80),
                    transform: Transform2D::default(),
                }],
            },
            LayerSpec {
                ratio: 1.0,
                tile_width: 16.0,
                repeat: None,
                placement: at_y(132.0),
                unit: vec![rect(0.0, 0.0, 16.0, 16.0, Rgba8::opaque(60, 96, 48))],
            },
            LayerSpec {
                ratio: 2.7,
                tile_width: 16.0,
                repeat: None,
                placement: at_y(124.0),
                unit: vec![
                    UnitItem::Sprite {
                        rows: vec![
                            "ww......".into(),
                            "wwdddddd".into(),
                            "ww......".into(),
                            "wwdddddd".into(),
                            "ww......".into(),
                        ],
                        palette,
                        transform: Transform2D::default(),
                    },
                    rect(8.0, 1.0, 16.0, 2.0, Rgba8::opaque(84, 56, 36)),
                ],
            },
        ],
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let out_dir = PathBuf::from("target").join("parallax_sweep");
    std::fs::create_dir_all(&out_dir)?;

    let spec = scene();
    std::fs::write(out_dir.join("scene.json"), spec.to_json_string()?)?;

    let mut scene = spec.build()?;
    let cameras = camera_sweep(0.0, 240.0, 4.0)?;
    for (i, camera) in cameras.iter().enumerate() {
        let frame = scene.render_frame(*camera)?;
        frame.save_png(out_dir.join(format!("frame_{i:05}.png")))?;
    }

    eprintln!(
        "wrote {} frames to {} ({:?})",
        cameras.len(),
        out_dir.display(),
        scene.upscaler_stats()
    );
    Ok(())
}
