//! Color gradients for heatmap rendering.

/// One anchor of a gradient: a color pinned at position `at` in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ColorStop {
    pub at: f32,
    pub rgb: [u8; 3],
}

/// Viridis-like gradient, dark purple through teal to yellow.
pub(crate) const VIRIDIS: [ColorStop; 5] = [
    ColorStop {
        at: 0.0,
        rgb: [68, 1, 84],
    },
    ColorStop {
        at: 0.25,
        rgb: [59, 82, 139],
    },
    ColorStop {
        at: 0.5,
        rgb: [33, 145, 140],
    },
    ColorStop {
        at: 0.75,
        rgb: [94, 201, 98],
    },
    ColorStop {
        at: 1.0,
        rgb: [253, 231, 37],
    },
];

/// Yellow-orange-red gradient used for visit counts.
pub(crate) const YL_OR_RD: [ColorStop; 5] = [
    ColorStop {
        at: 0.0,
        rgb: [255, 255, 204],
    },
    ColorStop {
        at: 0.25,
        rgb: [254, 217, 118],
    },
    ColorStop {
        at: 0.5,
        rgb: [253, 141, 60],
    },
    ColorStop {
        at: 0.75,
        rgb: [227, 26, 28],
    },
    ColorStop {
        at: 1.0,
        rgb: [128, 0, 38],
    },
];

/// Samples a gradient at `t`, clamped to `[0, 1]`.
///
/// Stops must be sorted by `at`. Non-finite input maps to the low end.
pub(crate) fn sample(stops: &[ColorStop], t: f32) -> [u8; 3] {
    let first = match stops.first() {
        Some(stop) => stop,
        None => return [0, 0, 0],
    };
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    if t <= first.at {
        return first.rgb;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.at {
            let span = (hi.at - lo.at).max(f32::EPSILON);
            return lerp(lo.rgb, hi.rgb, (t - lo.at) / span);
        }
    }
    stops[stops.len() - 1].rgb
}

fn lerp(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let v = f32::from(a[i]) + (f32::from(b[i]) - f32::from(a[i])) * t;
        *channel = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: [ColorStop; 2] = [
        ColorStop {
            at: 0.0,
            rgb: [0, 0, 0],
        },
        ColorStop {
            at: 1.0,
            rgb: [255, 255, 255],
        },
    ];

    #[test]
    fn endpoints_return_the_anchor_colors() {
        assert_eq!(sample(&VIRIDIS, 0.0), [68, 1, 84]);
        assert_eq!(sample(&VIRIDIS, 1.0), [253, 231, 37]);
        assert_eq!(sample(&YL_OR_RD, 0.5), [253, 141, 60]);
    }

    #[test]
    fn values_between_anchors_interpolate() {
        assert_eq!(sample(&GRAY, 0.5), [128, 128, 128]);
        assert_eq!(sample(&GRAY, 0.25), [64, 64, 64]);
    }

    #[test]
    fn out_of_range_input_clamps() {
        assert_eq!(sample(&GRAY, -3.0), [0, 0, 0]);
        assert_eq!(sample(&GRAY, 7.5), [255, 255, 255]);
    }

    #[test]
    fn non_finite_input_maps_to_the_low_end() {
        assert_eq!(sample(&GRAY, f32::NAN), [0, 0, 0]);
        assert_eq!(sample(&GRAY, f32::INFINITY), [0, 0, 0]);
    }
}
