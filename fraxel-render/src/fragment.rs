//! The WGSL fragment library.
//!
//! Kernel source is assembled from named fragments rather than ad hoc string
//! replacement: each fragment records which substitution tokens it needs, so
//! a missing parameter is caught when the source is built instead of
//! surfacing as a GPU compiler diagnostic.

/// A named piece of WGSL source with its substitution contract.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub name: &'static str,
    pub source: &'static str,
    /// Tokens that must be supplied when this fragment is instantiated.
    pub required_keys: &'static [&'static str],
}

/// Every token the template engine knows about. Substitution fails if any
/// of these survives in assembled source.
pub const KNOWN_TOKENS: [&str; 5] = [
    "{vec2type}",
    "{floattype}",
    "{escape_radius}",
    "{exponent}",
    "{julia_c}",
];

/// Uniform/image declarations shared by all escape-time kernels.
pub const HEADER_ESCAPE: Fragment = Fragment {
    name: "header_escape",
    source: include_str!("shaders/header_escape.wgsl"),
    required_keys: &[],
};

/// Linear pixel→complex interpolation, the GPU twin of
/// `Viewport::pixel_to_complex`.
pub const MAP_PIXEL: Fragment = Fragment {
    name: "map_pixel",
    source: include_str!("shaders/map_pixel.wgsl"),
    required_keys: &["{vec2type}", "{floattype}"],
};

/// Entry point: one invocation per pixel, 1×1×1 workgroup.
pub const ENTRY_ESCAPE: Fragment = Fragment {
    name: "entry_escape",
    source: include_str!("shaders/entry_escape.wgsl"),
    required_keys: &["{vec2type}", "{floattype}"],
};

pub const ITER_MANDELBROT: Fragment = Fragment {
    name: "iter_mandelbrot",
    source: include_str!("shaders/iter_mandelbrot.wgsl"),
    required_keys: &["{vec2type}", "{floattype}", "{escape_radius}"],
};

pub const ITER_MULTIBROT: Fragment = Fragment {
    name: "iter_multibrot",
    source: include_str!("shaders/iter_multibrot.wgsl"),
    required_keys: &["{vec2type}", "{floattype}", "{escape_radius}", "{exponent}"],
};

pub const ITER_JULIA: Fragment = Fragment {
    name: "iter_julia",
    source: include_str!("shaders/iter_julia.wgsl"),
    required_keys: &["{vec2type}", "{floattype}", "{escape_radius}", "{julia_c}"],
};

pub const ITER_MULTI_JULIA: Fragment = Fragment {
    name: "iter_multi_julia",
    source: include_str!("shaders/iter_multi_julia.wgsl"),
    required_keys: &[
        "{vec2type}",
        "{floattype}",
        "{escape_radius}",
        "{exponent}",
        "{julia_c}",
    ],
};

pub const ITER_BURNING_SHIP: Fragment = Fragment {
    name: "iter_burning_ship",
    source: include_str!("shaders/iter_burning_ship.wgsl"),
    required_keys: &["{vec2type}", "{floattype}", "{escape_radius}"],
};

pub const ITER_NEWTON: Fragment = Fragment {
    name: "iter_newton",
    source: include_str!("shaders/iter_newton.wgsl"),
    required_keys: &["{vec2type}", "{floattype}"],
};

/// Polynomial smooth coloring: the fixed cubic
/// `r = 9(1−t)t³, g = 15(1−t)²t², b = 8.5(1−t)³t`, black inside the set.
pub const COLOR_SMOOTH: Fragment = Fragment {
    name: "color_smooth",
    source: include_str!("shaders/color_smooth.wgsl"),
    required_keys: &[],
};

/// Fire coloring: linear/quadratic/cubic ramps of `t` per channel.
pub const COLOR_FIRE: Fragment = Fragment {
    name: "color_fire",
    source: include_str!("shaders/color_fire.wgsl"),
    required_keys: &[],
};

/// Discrete 3-way coloring by Newton root index; −1 renders black.
pub const COLOR_DISCRETE: Fragment = Fragment {
    name: "color_discrete",
    source: include_str!("shaders/color_discrete.wgsl"),
    required_keys: &[],
};

/// The Sierpinski carpet is not escape-time: it ships as one standalone
/// template with its own uniform block.
pub const CARPET: Fragment = Fragment {
    name: "carpet",
    source: include_str!("shaders/carpet.wgsl"),
    required_keys: &["{vec2type}", "{floattype}"],
};
