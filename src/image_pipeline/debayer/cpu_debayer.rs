use anyhow::{Result, bail};
use tracing::{debug, info};
use std::io::Cursor;
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use crate::image_pipeline::conversions::DemosaicMethod;
use crate::image_pipeline::debayer::RgbImageData;
use crate::image_pipeline::negative::{DngNegative, RawLayout};
use crate::image_pipeline::raw::{CfaLayout, RawImageData};

/// Standard XYZ to sRGB (D65) matrix
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [ 3.2404542, -1.5371385, -0.4985314],
    [-0.9692660,  1.8760108,  0.0415560],
    [ 0.0556434, -0.2040259,  1.0572252],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Renders CFA or linear raw data into a cropped, linear sRGB image on the CPU.
pub struct CpuDebayer {
    method: DemosaicMethod,
}

impl CpuDebayer {
    pub fn new(method: DemosaicMethod) -> Self {
        Self { method }
    }

    pub fn process(&self, raw_image: &RawImageData, negative: &DngNegative) -> Result<RgbImageData> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Starting CPU debayering for image {}x{}", width, height);

        let camera_rgb = match &negative.layout {
            RawLayout::LinearRaw => raw_image.data[..width * height * 3].to_vec(),
            RawLayout::Cfa(cfa) => match bayer_cfa(cfa) {
                Some(pattern) => {
                    debug!("Running demosaic with CFA={:?}, algo={:?}", cfa.pattern, self.method);
                    self.demosaic_bayer(raw_image, pattern)?
                }
                None => {
                    debug!("CFA {}x{} is not a Bayer pattern, using neighbourhood demosaic", cfa.width, cfa.height);
                    demosaic_neighbourhood(raw_image, cfa)
                }
            },
        };

        let cam_to_srgb = camera_to_srgb(&raw_image.cam_to_xyz);

        // Per-channel levels after demosaicing
        let black = [
            raw_image.blacklevels[0] as f32,
            raw_image.blacklevels[1] as f32,
            raw_image.blacklevels[2] as f32,
        ];
        let white = negative.white_level as f32;
        let wb = negative.as_shot_neutral.map(|n| 1.0 / n);

        let (crop_x, crop_y) = (negative.crop_origin.0 as usize, negative.crop_origin.1 as usize);
        let (out_w, out_h) = (negative.crop_size.0 as usize, negative.crop_size.1 as usize);

        let mut rgb_data = Vec::with_capacity(out_w * out_h * 3);
        for y in crop_y..crop_y + out_h {
            let row = &camera_rgb[(y * width + crop_x) * 3..(y * width + crop_x + out_w) * 3];
            for pixel in row.chunks_exact(3) {
                // Black Level & Normalize & WB
                let mut lin = [0.0f32; 3];
                for c in 0..3 {
                    let range = (white - black[c]).max(1.0);
                    lin[c] = ((pixel[c] as f32 - black[c]).max(0.0) / range) * wb[c];
                }

                // Color Matrix (Cam -> sRGB), clamp and scale to u16
                for m in &cam_to_srgb {
                    let v = m[0] * lin[0] + m[1] * lin[1] + m[2] * lin[2];
                    rgb_data.push((v * 65535.0).clamp(0.0, 65535.0) as u16);
                }
            }
        }

        Ok(RgbImageData {
            width: out_w,
            height: out_h,
            data: rgb_data,
        })
    }

    fn demosaic_bayer(&self, raw_image: &RawImageData, pattern: CFA) -> Result<Vec<u16>> {
        let width = raw_image.width;
        let height = raw_image.height;

        let bayer_bytes: Vec<u8> = raw_image.data[..width * height]
            .iter()
            .flat_map(|&val| val.to_le_bytes())
            .collect();

        let output_buf_size = width * height * 3 * 2;
        let mut output_buf = vec![0u8; output_buf_size];
        let mut cursor = Cursor::new(&bayer_bytes[..]);

        let algorithm = match self.method {
            DemosaicMethod::NearestNeighbour => Demosaic::NearestNeighbour,
            DemosaicMethod::Linear => Demosaic::Linear,
            DemosaicMethod::Cubic => Demosaic::Cubic,
        };

        {
            let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
            bayer::run_demosaic(&mut cursor, BayerDepth::Depth16LE, pattern, algorithm, &mut output_raster)
                .map_err(|e| anyhow::anyhow!("Demosaic failed: {:?}", e))?;
        }

        let rgb: Vec<u16> = output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect();
        if rgb.len() != width * height * 3 {
            bail!("Demosaic produced {} samples, expected {}", rgb.len(), width * height * 3);
        }
        Ok(rgb)
    }
}

fn bayer_cfa(cfa: &CfaLayout) -> Option<CFA> {
    if !cfa.is_rgb_bayer() {
        return None;
    }
    match cfa.pattern[..] {
        [0, 1, 1, 2] => Some(CFA::RGGB),
        [2, 1, 1, 0] => Some(CFA::BGGR),
        [1, 0, 2, 1] => Some(CFA::GRBG),
        [1, 2, 0, 1] => Some(CFA::GBRG),
        _ => None,
    }
}

/// Averages same-colored samples in the 3x3 neighbourhood of each pixel.
/// Works for any CFA where each color shows up within every 3x3 window (Bayer, X-Trans).
fn demosaic_neighbourhood(raw_image: &RawImageData, cfa: &CfaLayout) -> Vec<u16> {
    let width = raw_image.width;
    let height = raw_image.height;
    let mut rgb = vec![0u16; width * height * 3];

    for y in 0..height {
        for x in 0..width {
            let mut sums = [0u32; 3];
            let mut counts = [0u32; 3];
            for ny in y.saturating_sub(1)..(y + 2).min(height) {
                for nx in x.saturating_sub(1)..(x + 2).min(width) {
                    let color = cfa.color_at(ny, nx) as usize;
                    if color < 3 {
                        sums[color] += raw_image.data[ny * width + nx] as u32;
                        counts[color] += 1;
                    }
                }
            }

            let own = cfa.color_at(y, x) as usize;
            let out = &mut rgb[(y * width + x) * 3..(y * width + x) * 3 + 3];
            for c in 0..3 {
                out[c] = if c == own {
                    raw_image.data[y * width + x]
                } else if counts[c] > 0 {
                    (sums[c] / counts[c]) as u16
                } else {
                    0
                };
            }
        }
    }
    rgb
}

/// Combined camera -> XYZ -> sRGB matrix.
fn camera_to_srgb(cam_to_xyz: &[[f32; 4]; 3]) -> [[f32; 3]; 3] {
    let usable = cam_to_xyz.iter().flatten().all(|v| v.is_finite())
        && cam_to_xyz.iter().flatten().any(|&v| v != 0.0);
    if !usable {
        return IDENTITY;
    }

    let mut cam_to_srgb = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c];
            }
            cam_to_srgb[r][c] = sum;
        }
    }
    cam_to_srgb
}
