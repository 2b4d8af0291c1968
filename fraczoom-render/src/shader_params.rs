//! Fixed-layout parameter record shared with the fragment program.
//!
//! The byte layout here is a compile-time contract with the shader: every
//! field is a 4-byte `f32`/`i32` lane and the order must match the shader's
//! `struct` declaration exactly. The layout tests at the bottom pin it down.

use bytemuck::{Pod, Zeroable};

use fraczoom_core::camera::ROOT_COUNT;
use fraczoom_core::{Camera, DoubleFloat, DoubleFloat2, FractalKind, NewtonColouring, Polynomial};

/// Shader should evaluate in double-float rather than plain `f32`.
pub const FLAG_USE_DOUBLE_PRECISION: i32 = 1;
/// Iterate `z² + c` with `c` fixed and `z₀` taken from the pixel.
pub const FLAG_JULIA_MODE: i32 = 1 << 2;
/// Newton: colour by converged root instead of iteration count.
pub const FLAG_ROOT_COLOURING: i32 = 1 << 3;

/// Coefficient slots for the cubic and its (zero-padded) derivative.
pub const NEWTON_COEFFICIENTS: usize = 4;

/// Header shared by every fractal kind.
///
/// `_pad` rounds the struct to 56 bytes so a following Newton block starts
/// on the 8-byte boundary the shader's `float2` members need.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub zoom: DoubleFloat,
    pub offset: DoubleFloat2,
    pub step_count: i32,
    pub colour_period: i32,
    pub seed: DoubleFloat2,
    pub flags: i32,
    pub _pad: i32,
}

/// Newton-only tail: `f`, `f'` and the roots for nearest-root colouring.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct NewtonUniforms {
    pub coefficients: [DoubleFloat2; NEWTON_COEFFICIENTS],
    pub derivative: [DoubleFloat2; NEWTON_COEFFICIENTS],
    pub roots: [DoubleFloat2; ROOT_COUNT],
}

/// Everything the render collaborator needs for one frame.
///
/// Built fresh for each produced frame and never mutated afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShaderParameters {
    pub frame: FrameUniforms,
    pub newton: Option<NewtonUniforms>,
}

impl ShaderParameters {
    /// Pack the camera into shader parameters. Pure; never fails.
    pub fn build(camera: &Camera) -> Self {
        let mode = camera.mode();

        let mut flags = 0;
        if camera.uses_double_precision() {
            flags |= FLAG_USE_DOUBLE_PRECISION;
        }
        if mode == FractalKind::Julia {
            flags |= FLAG_JULIA_MODE;
        }
        if mode == FractalKind::Newton && camera.newton_colouring() == NewtonColouring::Root {
            flags |= FLAG_ROOT_COLOURING;
        }

        let frame = FrameUniforms {
            zoom: DoubleFloat::split(camera.zoom()),
            offset: DoubleFloat2::split(camera.offset()),
            step_count: camera.step_count() as i32,
            colour_period: camera.colour_period() as i32,
            seed: DoubleFloat2::split(camera.julia_seed()),
            flags,
            _pad: 0,
        };

        let newton = (mode == FractalKind::Newton).then(|| newton_uniforms(camera));

        Self { frame, newton }
    }

    #[inline]
    pub fn flags(&self) -> i32 {
        self.frame.flags
    }

    #[inline]
    pub fn has_flag(&self, flag: i32) -> bool {
        self.frame.flags & flag != 0
    }

    /// Total size of [`as_bytes`](Self::as_bytes).
    pub fn byte_len(&self) -> usize {
        std::mem::size_of::<FrameUniforms>()
            + self
                .newton
                .as_ref()
                .map_or(0, |_| std::mem::size_of::<NewtonUniforms>())
    }

    /// The buffer to copy verbatim into the GPU constant buffer, always
    /// little-endian.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        bytes.extend_from_slice(bytemuck::bytes_of(&self.frame));
        if let Some(newton) = &self.newton {
            bytes.extend_from_slice(bytemuck::bytes_of(newton));
        }
        // Every field is a 4-byte lane.
        if cfg!(target_endian = "big") {
            for lane in bytes.chunks_exact_mut(4) {
                lane.reverse();
            }
        }
        bytes
    }
}

/// Cubic through the camera's three roots, plus its derivative.
///
/// Coincident roots are fine: the polynomial just has a repeated factor.
fn newton_uniforms(camera: &Camera) -> NewtonUniforms {
    let [first, rest @ ..] = camera.roots();
    let f = Polynomial::from_nonempty_roots(first, &rest);
    let df = f.derivative();
    NewtonUniforms {
        coefficients: std::array::from_fn(|i| DoubleFloat2::split(f.coefficient(i))),
        derivative: std::array::from_fn(|i| DoubleFloat2::split(df.coefficient(i))),
        roots: camera.roots().map(DoubleFloat2::split),
    }
}
