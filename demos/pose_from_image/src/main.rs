use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use argh::FromArgs;
use argus::calib::CameraModel;
use argus::image::{color::rgb_from_gray_u8, GrayImage, Image, ImageSize};
use argus::marker::{
    detector::draw_detections, MarkerDetector, MarkerPoseEstimator, TagFamily,
};
use argus::planar::{DescriptorPattern, PlanarPoseEstimator, ReferenceTarget};
use argus::pose::TrackingSession;
use png::{BitDepth, ColorType, Decoder, Encoder};

/// Estimates a camera pose from a single image and prints the GL matrices.
#[derive(Debug, FromArgs)]
struct Args {
    /// image path (png)
    #[argh(positional)]
    path: String,

    /// calibration file path (json)
    #[argh(option, short = 'c')]
    calibration: String,

    /// tracking mode: "marker" or "planar"
    #[argh(option, short = 'm', default = "String::from(\"marker\")")]
    mode: String,

    /// reference image for planar mode (png)
    #[argh(option, short = 'r')]
    reference: Option<String>,

    /// physical marker side length in scene units
    #[argh(option, default = "1.75")]
    marker_size: f32,

    /// near clip plane
    #[argh(option, default = "0.01")]
    near: f32,

    /// far clip plane
    #[argh(option, default = "1000.0")]
    far: f32,

    /// write a detection overlay to this path (marker mode, png)
    #[argh(option, short = 'o')]
    overlay: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let camera = CameraModel::load(&args.calibration)?;
    let frame = read_png_gray8(&args.path)?;

    let mut session = match args.mode.as_str() {
        "marker" => {
            if let Some(path) = &args.overlay {
                write_marker_overlay(&frame, path)?;
            }
            let detector = MarkerDetector::new(TagFamily::tag16_h5());
            let estimator =
                MarkerPoseEstimator::with_side_length(detector, camera.clone(), args.marker_size);
            TrackingSession::new(camera, Box::new(estimator), args.near, args.far)?
        }
        "planar" => {
            let reference_path = args
                .reference
                .as_deref()
                .ok_or("planar mode requires --reference")?;
            let reference = read_png_gray8(reference_path)?;
            let pattern = DescriptorPattern::new();
            let target = ReferenceTarget::from_image(&reference, &pattern)?;
            let estimator =
                PlanarPoseEstimator::new(target, camera.clone(), DescriptorPattern::new());
            TrackingSession::new(camera, Box::new(estimator), args.near, args.far)?
        }
        other => return Err(format!("unknown mode {other:?}").into()),
    };

    let found = session.process_frame(&frame);
    println!("pose found: {found}");
    print_matrix("projection", session.projection_matrix());
    print_matrix("view", session.view_matrix());

    Ok(())
}

/// Print a matrix column by column, the way it would be uploaded to GL.
fn print_matrix(name: &str, m: glam::Mat4) {
    println!("{name}:");
    for col in m.to_cols_array_2d() {
        println!("  [{:+.5} {:+.5} {:+.5} {:+.5}]", col[0], col[1], col[2], col[3]);
    }
}

fn read_png_gray8(path: impl AsRef<Path>) -> Result<GrayImage, Box<dyn std::error::Error>> {
    let file = File::open(path.as_ref())?;
    let mut reader = Decoder::new(file).read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    match (info.color_type, info.bit_depth) {
        (ColorType::Grayscale, BitDepth::Eight) => Ok(GrayImage::new(size, buf)?),
        (ColorType::Rgb, BitDepth::Eight) => {
            let rgb = Image::<u8, 3>::new(size, buf)?;
            let mut gray = GrayImage::from_size_val(size, 0u8);
            argus::image::color::gray_from_rgb_u8(&rgb, &mut gray)?;
            Ok(gray)
        }
        (color, depth) => Err(format!("unsupported png format {color:?}/{depth:?}").into()),
    }
}

fn write_marker_overlay(
    frame: &GrayImage,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut detector = MarkerDetector::new(TagFamily::tag16_h5());
    let detections = detector.detect(frame)?;
    log::info!("{} markers detected", detections.len());

    let mut rgb = Image::<u8, 3>::from_size_val(frame.size(), 0u8);
    rgb_from_gray_u8(frame, &mut rgb)?;
    draw_detections(&mut rgb, &detections, [0, 255, 0]);

    let file = File::create(path.as_ref())?;
    let mut encoder = Encoder::new(
        BufWriter::new(file),
        frame.cols() as u32,
        frame.rows() as u32,
    );
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.write_header()?.write_image_data(rgb.as_slice())?;
    Ok(())
}
