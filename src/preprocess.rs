//! The classifier's packaged input transform.
//!
//! Mirrors the torchvision ResNet pipeline: resize the shorter side to 256
//! (bilinear), center-crop to 224x224, scale to `[0, 1]`, then normalize per
//! channel with the ImageNet statistics.

use image::imageops::{self, FilterType};
use image::RgbImage;
use tract_onnx::prelude::tract_ndarray::Array4;

/// Target length of the shorter side before cropping.
pub const RESIZE_SIZE: u32 = 256;
/// Side length of the square network input.
pub const CROP_SIZE: u32 = 224;
/// Per-channel mean of the ImageNet training set.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// Per-channel standard deviation of the ImageNet training set.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resize so the shorter side equals `target`, preserving aspect ratio.
///
/// Uses bilinear filtering. An image whose shorter side already equals
/// `target` is returned unchanged.
#[must_use]
pub fn resize_shorter_side(img: &RgbImage, target: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w.min(h) == target {
        return img.clone();
    }

    // Scale the longer side proportionally; flooring keeps it >= target.
    #[allow(clippy::cast_possible_truncation)]
    let (new_w, new_h) = if w <= h {
        (target, (u64::from(h) * u64::from(target) / u64::from(w)) as u32)
    } else {
        ((u64::from(w) * u64::from(target) / u64::from(h)) as u32, target)
    };

    imageops::resize(img, new_w, new_h, FilterType::Triangle)
}

/// Crop a centered `size` x `size` square.
///
/// Odd differences split with the extra pixel on the bottom/right, matching
/// the floor-division placement used by the reference transform. Dimensions
/// smaller than `size` are clamped rather than padded.
#[must_use]
pub fn center_crop(img: &RgbImage, size: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == size && h == size {
        return img.clone();
    }

    let x = w.saturating_sub(size) / 2;
    let y = h.saturating_sub(size) / 2;
    imageops::crop_imm(img, x, y, size.min(w), size.min(h)).to_image()
}

/// Run the full transform and lay the result out as a `1x3xHxW` tensor.
///
/// Each channel value becomes `(v / 255 - mean[c]) / std[c]`.
#[must_use]
pub fn to_input_tensor(img: &RgbImage) -> Array4<f32> {
    let resized = resize_shorter_side(img, RESIZE_SIZE);
    let cropped = center_crop(&resized, CROP_SIZE);

    Array4::from_shape_fn(
        (1, 3, CROP_SIZE as usize, CROP_SIZE as usize),
        |(_, c, y, x)| {
            #[allow(clippy::cast_possible_truncation)]
            let px = cropped.get_pixel(x as u32, y as u32);
            (f32::from(px[c]) / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c]
        },
    )
}
