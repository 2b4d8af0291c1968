use fraczoom_core::{Camera, Complex, FractalKind, PanDirection, Rect, Viewport};

fn retina_viewport() -> Viewport {
    Viewport::new(Rect::new(150.0, 28.0, 1024.0, 700.0), 2.0, 1.0).unwrap()
}

/// A scripted session: scroll deep at an off-centre point, drag, then scroll
/// back out. The point under the cursor must survive every zoom.
#[test]
fn deep_zoom_keeps_cursor_anchor() {
    let vp = retina_viewport();
    let mut cam = Camera::default();
    let (px, py) = (402.0, 611.5);
    let anchor = cam.fractal_point(px, py, &vp);

    for _ in 0..200 {
        cam.apply_scroll(50.0, px, py, &vp);
        let now = cam.fractal_point(px, py, &vp);
        assert!((now.re - anchor.re).abs() < 1e-9, "re drifted at zoom {}", cam.zoom());
        assert!((now.im - anchor.im).abs() < 1e-9, "im drifted at zoom {}", cam.zoom());
    }
    assert_eq!(cam.zoom(), 2f64.powi(50));
}

#[test]
fn drag_then_zoom_out_returns_to_floor() {
    let vp = retina_viewport();
    let mut cam = Camera::default();
    assert!(cam.apply_drag(-120.0, 64.0, 600.0, 300.0, &vp));
    for _ in 0..100 {
        cam.apply_scroll(-400.0, 600.0, 300.0, &vp);
    }
    assert_eq!(cam.zoom(), FractalKind::Mandelbrot.min_zoom());
}

#[test]
fn resolution_change_with_compensation_keeps_picture() {
    let vp = retina_viewport();
    let mut cam = Camera::default();
    let probes = [(150.0, 728.0), (662.0, 378.0), (1100.0, 40.0)];
    let before: Vec<Complex> = probes
        .iter()
        .map(|&(x, y)| cam.fractal_point(x, y, &vp))
        .collect();

    let lower = vp.with_resolution_scale(4.0).unwrap();
    cam.rescale_zoom(vp.resolution_scale / lower.resolution_scale);

    for (&(x, y), b) in probes.iter().zip(&before) {
        let after = cam.fractal_point(x, y, &lower);
        assert!((after.re - b.re).abs() < 1e-12);
        assert!((after.im - b.im).abs() < 1e-12);
    }
}

#[test]
fn julia_round_trip_through_newton() {
    let vp = retina_viewport();
    let mut cam = Camera::default();
    cam.set_offset(Complex::new(1.0, 2.0));

    cam.set_mode(FractalKind::Julia);
    cam.press_key(PanDirection::Left);
    cam.advance_pan();
    cam.release_key(PanDirection::Left);
    let seed = cam.julia_seed();
    assert!(seed.re < 1.0);

    cam.set_mode(FractalKind::Newton);
    assert_eq!(cam.zoom(), 1.0);
    assert_eq!(cam.offset(), seed);
    cam.apply_scroll(-100.0, 600.0, 300.0, &vp);
    assert!(cam.zoom() < 1.0);

    cam.set_mode(FractalKind::Mandelbrot);
    assert_eq!(cam.zoom(), 1.0);
}
