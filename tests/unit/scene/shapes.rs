use super::*;
use crate::render::surface::Surface;

fn palette() -> BTreeMap<char, Rgba8> {
    BTreeMap::from([
        ('g', Rgba8::opaque(40, 160, 60)),
        ('b', Rgba8::opaque(90, 60, 30)),
    ])
}

#[test]
fn sprite_rows_map_through_palette() {
    let s = PixelSprite::from_rows(&["g.g", "bbb"], &palette()).unwrap();
    assert_eq!((s.width(), s.height()), (3, 2));
    assert_eq!(s.cell(0, 0), Some(Rgba8::opaque(40, 160, 60)));
    assert_eq!(s.cell(1, 0), None);
    assert_eq!(s.cell(2, 1), Some(Rgba8::opaque(90, 60, 30)));
    assert_eq!(s.cell(3, 0), None);
    assert_eq!(s.local_bounds(), Rect::new(0.0, 0.0, 3.0, 2.0));
}

#[test]
fn sprite_rejects_ragged_rows_and_unknown_chars() {
    assert!(PixelSprite::from_rows(&["gg", "g"], &palette()).is_err());
    assert!(PixelSprite::from_rows(&["gx"], &palette()).is_err());
    assert!(PixelSprite::new(2, 2, vec![None; 3]).is_err());
}

#[test]
fn sprite_runs_merge_equal_neighbours() {
    let s = PixelSprite::from_rows(&["ggb.g"], &palette()).unwrap();
    let runs: Vec<_> = s.runs().map(|(y, x0, x1, _)| (y, x0, x1)).collect();
    assert_eq!(runs, vec![(0, 0, 2), (0, 2, 3), (0, 4, 5)]);
}

#[test]
fn sprite_draws_cells_at_unit_squares() {
    let s = PixelSprite::from_rows(&["g.", ".b"], &palette()).unwrap();
    let mut surface = Surface::new(2, 2).unwrap();
    surface.draw(&s, Affine::IDENTITY).unwrap();

    assert!(surface.pixel(0, 0).unwrap()[3] >= 250);
    assert_eq!(surface.pixel(1, 0), Some([0, 0, 0, 0]));
    assert_eq!(surface.pixel(0, 1), Some([0, 0, 0, 0]));
    assert!(surface.pixel(1, 1).unwrap()[3] >= 250);
}

#[test]
fn fill_path_bounds_follow_geometry() {
    let f = FillPath::from_svg("M2,3 L10,3 L10,7 Z", Rgba8::opaque(1, 2, 3)).unwrap();
    assert_eq!(f.local_bounds(), Rect::new(2.0, 3.0, 10.0, 7.0));
    assert!(FillPath::from_svg("M2,3 X4,4", Rgba8::opaque(1, 2, 3)).is_err());

    let r = FillPath::rect(Rect::new(0.0, 0.0, 4.0, 2.0), Rgba8::opaque(1, 2, 3));
    assert_eq!(r.local_bounds(), Rect::new(0.0, 0.0, 4.0, 2.0));
}

#[test]
fn group_bounds_union_transformed_children() {
    let unit: Arc<dyn Drawable> = Arc::new(FillPath::rect(
        Rect::new(0.0, 0.0, 2.0, 2.0),
        Rgba8::opaque(9, 9, 9),
    ));
    let g = Group::new()
        .with(Affine::IDENTITY, unit.clone())
        .with(Affine::translate((10.0, -4.0)), unit.clone());
    assert_eq!(g.len(), 2);
    assert_eq!(g.local_bounds(), Rect::new(0.0, -4.0, 12.0, 2.0));

    let lone = Group::new().with(Affine::translate((10.0, -4.0)), unit);
    assert_eq!(lone.local_bounds(), Rect::new(10.0, -4.0, 12.0, -2.0));
    assert_eq!(Group::new().local_bounds(), Rect::ZERO);
}
