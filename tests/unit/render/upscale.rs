use super::*;
use crate::foundation::core::{Rect, Rgba8};
use crate::render::composite::PremulRgba8;

struct Block {
    rect: Rect,
    color: Rgba8,
}

impl Drawable for Block {
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        painter.fill_rect(self.rect, transform, self.color);
        Ok(())
    }

    fn local_bounds(&self) -> Rect {
        self.rect
    }
}

fn red_block(x1: f64, y1: f64) -> Block {
    Block {
        rect: Rect::new(0.0, 0.0, x1, y1),
        color: Rgba8::opaque(255, 0, 0),
    }
}

fn block_pixels(s: &Surface, x0: u32, y0: u32, size: u32) -> Vec<PremulRgba8> {
    let mut out = Vec::new();
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            out.push(s.pixel(x, y).unwrap());
        }
    }
    out
}

#[test]
fn low_res_size_divides_and_rounds() {
    assert_eq!(low_res_size(88, 44, 44.0 / 16.0).unwrap(), (32, 16));
    assert_eq!(low_res_size(64, 48, 4.0).unwrap(), (16, 12));
    assert_eq!(low_res_size(3, 3, 8.0).unwrap(), (1, 1));
    assert_eq!(low_res_size(0, 10, 2.0).unwrap(), (0, 5));
    // Factors below one grow the buffer past the destination.
    assert_eq!(low_res_size(7, 5, 0.5).unwrap(), (14, 10));
}

#[test]
fn non_positive_factor_is_rejected() {
    let mut up = Upscaler::new();
    let mut dest = Surface::new(8, 8).unwrap();
    for factor in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            up.render(&mut dest, &red_block(4.0, 4.0), factor),
            Err(WavyteError::Validation(_))
        ));
    }
    assert!(up.buffer_size().is_none());
    assert!(low_res_size(8, 8, 0.0).is_err());
}

#[test]
fn zero_sized_destination_is_a_noop() {
    let mut up = Upscaler::new();
    let mut dest = Surface::new(0, 0).unwrap();
    up.render(&mut dest, &red_block(4.0, 4.0), 2.0).unwrap();
    assert!(up.buffer_size().is_none());
    assert_eq!(up.stats(), UpscalerStats::default());
}

#[test]
fn magnified_blocks_are_uniform() {
    let mut up = Upscaler::new();
    let mut dest = Surface::new(8, 8).unwrap();
    up.render(&mut dest, &red_block(4.0, 4.0), 4.0).unwrap();

    assert_eq!(up.buffer_size(), Some((2, 2)));
    let top_left = block_pixels(&dest, 0, 0, 4);
    assert!(top_left.iter().all(|p| *p == top_left[0]));
    assert!(top_left[0][0] >= 250 && top_left[0][3] >= 250);

    let bottom_right = block_pixels(&dest, 4, 4, 4);
    assert!(bottom_right.iter().all(|p| *p == [0, 0, 0, 0]));
}

#[test]
fn sub_pixel_content_fills_a_whole_block_without_gradients() {
    let mut up = Upscaler::new();
    let mut dest = Surface::new(8, 8).unwrap();
    // Half of one low-res pixel wide.
    up.render(&mut dest, &red_block(2.0, 4.0), 4.0).unwrap();

    let block = block_pixels(&dest, 0, 0, 4);
    assert!(block.iter().all(|p| *p == block[0]));
    assert!(block[0][3] > 0 && block[0][3] < 255);
}

#[test]
fn buffer_is_reused_until_size_or_factor_changes() {
    let mut up = Upscaler::new();
    let mut dest = Surface::new(16, 16).unwrap();
    let src = red_block(4.0, 4.0);

    up.render(&mut dest, &src, 2.0).unwrap();
    up.render(&mut dest, &src, 2.0).unwrap();
    assert_eq!(
        up.stats(),
        UpscalerStats {
            frames: 2,
            allocations: 1
        }
    );

    up.render(&mut dest, &src, 4.0).unwrap();
    assert_eq!(up.stats().allocations, 2);
    assert_eq!(up.buffer_size(), Some((4, 4)));

    let mut bigger = Surface::new(32, 16).unwrap();
    up.render(&mut bigger, &src, 4.0).unwrap();
    assert_eq!(up.stats().allocations, 3);
    assert_eq!(up.buffer_size(), Some((8, 4)));
}

#[test]
fn repeated_frames_produce_identical_buffers() {
    let mut up = Upscaler::new();
    let src = red_block(5.5, 3.25);

    let mut a = Surface::new(24, 12).unwrap();
    up.render(&mut a, &src, 3.0).unwrap();
    let first = up.buffer_data().unwrap().to_vec();

    let mut b = Surface::new(24, 12).unwrap();
    up.render(&mut b, &src, 3.0).unwrap();
    assert_eq!(up.buffer_data().unwrap(), first.as_slice());
    assert_eq!(a, b);
}

#[test]
fn previous_frame_does_not_leak_into_the_next() {
    let mut up = Upscaler::new();
    let mut dest = Surface::new(8, 8).unwrap();
    up.render(&mut dest, &red_block(8.0, 8.0), 2.0).unwrap();

    let empty = Block {
        rect: Rect::ZERO,
        color: Rgba8::TRANSPARENT,
    };
    let mut fresh = Surface::new(8, 8).unwrap();
    up.render(&mut fresh, &empty, 2.0).unwrap();
    assert!(up.buffer_data().unwrap().iter().all(|&b| b == 0));
    assert!(fresh.data().iter().all(|&b| b == 0));
}

#[test]
fn instances_do_not_share_buffers() {
    let mut a = Upscaler::new();
    let mut b = Upscaler::new();
    let mut dest = Surface::new(8, 8).unwrap();
    a.render(&mut dest, &red_block(8.0, 8.0), 2.0).unwrap();
    assert!(b.buffer_data().is_none());

    let empty = Block {
        rect: Rect::ZERO,
        color: Rgba8::TRANSPARENT,
    };
    let mut other = Surface::new(8, 8).unwrap();
    b.render(&mut other, &empty, 2.0).unwrap();
    assert!(b.buffer_data().unwrap().iter().all(|&x| x == 0));
    assert!(a.buffer_data().unwrap().iter().any(|&x| x != 0));
}
