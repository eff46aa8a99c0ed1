use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use image::RgbImage;

use crate::image_pipeline::common::config::{BandSelection, ConversionConfig, FailureMode};
use crate::image_pipeline::common::error::{ConversionError, ErrorKind, Result};
use crate::image_pipeline::conversions::RasterToImagePipeline;
use crate::image_pipeline::output::{ImageWriter, OutputFormat};
use crate::image_pipeline::raster::{
    RasterArray, RasterReader, RasterSamples, RasterShape, SampleType,
};

struct MockReader {
    should_fail: bool,
    mock_data: Option<RasterArray>,
}

impl RasterReader for MockReader {
    fn read_raster(&self, _data: &[u8]) -> Result<RasterArray> {
        if self.should_fail {
            return Err(ConversionError::OpenError("Mock open error".to_string()));
        }
        Ok(self.mock_data.clone().unwrap_or(RasterArray {
            shape: RasterShape::Stack {
                bands: 3,
                height: 10,
                width: 10,
            },
            samples: RasterSamples::U16((0..300).collect()),
        }))
    }
}

struct MockWriter {
    should_fail: bool,
    written_data: Arc<Mutex<Vec<(RgbImage, OutputFormat)>>>,
}

impl ImageWriter for MockWriter {
    fn write_image(
        &self,
        image: &RgbImage,
        format: OutputFormat,
        _output: &mut dyn Write,
        _config: &ConversionConfig,
    ) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        self.written_data
            .lock()
            .unwrap()
            .push((image.clone(), format));
        Ok(())
    }
}

fn pipeline_with(
    mock_data: Option<RasterArray>,
    config: ConversionConfig,
) -> (
    RasterToImagePipeline<MockReader, MockWriter>,
    Arc<Mutex<Vec<(RgbImage, OutputFormat)>>>,
) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader {
        should_fail: false,
        mock_data,
    };
    let writer = MockWriter {
        should_fail: false,
        written_data: written.clone(),
    };
    (
        RasterToImagePipeline::with_custom(reader, writer, config),
        written,
    )
}

#[test]
fn test_successful_conversion() {
    let (pipeline, written) = pipeline_with(None, ConversionConfig::default());

    let mut output = Cursor::new(Vec::new());
    let report = pipeline
        .convert(b"fake tiff data", OutputFormat::Jpeg, &mut output)
        .unwrap();

    assert_eq!((report.width, report.height), (10, 10));
    assert_eq!(report.source_bands, 3);
    assert_eq!(report.sample_type, SampleType::U16);
    assert!(report.normalized);
    assert_eq!(report.output_path, None);

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].1, OutputFormat::Jpeg);
    // Global range [0, 299]: first pixel is bands 0/100/200
    assert_eq!(written[0].0.get_pixel(0, 0).0, [0, 85, 171]);
}

#[test]
fn test_reader_failure() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader {
        should_fail: true,
        mock_data: None,
    };
    let writer = MockWriter {
        should_fail: false,
        written_data: written.clone(),
    };

    let pipeline = RasterToImagePipeline::with_custom(reader, writer, ConversionConfig::default());

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(b"fake tiff data", OutputFormat::Png, &mut output);

    assert!(matches!(result, Err(ConversionError::OpenError(_))));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_writer_failure() {
    let reader = MockReader {
        should_fail: false,
        mock_data: None,
    };
    let writer = MockWriter {
        should_fail: true,
        written_data: Arc::new(Mutex::new(Vec::new())),
    };

    let pipeline = RasterToImagePipeline::with_custom(reader, writer, ConversionConfig::default());

    let mut output = Cursor::new(Vec::new());
    let err = pipeline
        .convert(b"fake tiff data", OutputFormat::Png, &mut output)
        .unwrap_err();

    assert!(matches!(err, ConversionError::EncodeError(_)));
    assert_eq!(err.kind(), ErrorKind::EncodeOrWrite);
}

#[test]
fn test_two_band_raster_is_rejected() {
    let two_bands = RasterArray {
        shape: RasterShape::Stack {
            bands: 2,
            height: 2,
            width: 2,
        },
        samples: RasterSamples::F32(vec![0.0; 8]),
    };
    let (pipeline, written) = pipeline_with(Some(two_bands), ConversionConfig::default());

    let mut output = Cursor::new(Vec::new());
    let err = pipeline
        .convert(b"fake tiff data", OutputFormat::Png, &mut output)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedBandConfig);
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_grayscale_is_replicated_across_channels() {
    let gray = RasterArray {
        shape: RasterShape::Grid {
            height: 1,
            width: 3,
        },
        samples: RasterSamples::U8(vec![7, 128, 255]),
    };
    let (pipeline, written) = pipeline_with(Some(gray), ConversionConfig::default());

    let mut output = Cursor::new(Vec::new());
    let report = pipeline
        .convert(b"fake tiff data", OutputFormat::Png, &mut output)
        .unwrap();
    assert!(!report.normalized);

    let written = written.lock().unwrap();
    let pixels: Vec<[u8; 3]> = written[0].0.pixels().map(|p| p.0).collect();
    assert_eq!(pixels, vec![[7, 7, 7], [128, 128, 128], [255, 255, 255]]);
}

#[test]
fn test_band_selection_is_configurable() {
    let config = ConversionConfig::builder()
        .band_selection(BandSelection::Single(2))
        .build();
    let (pipeline, written) = pipeline_with(None, config);

    let mut output = Cursor::new(Vec::new());
    pipeline
        .convert(b"fake tiff data", OutputFormat::Png, &mut output)
        .unwrap();

    // Band 2 holds 200..300, rescaled to its own range
    let written = written.lock().unwrap();
    assert_eq!(written[0].0.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(written[0].0.get_pixel(9, 9).0, [255, 255, 255]);
}

#[test]
fn test_dimension_validation_failure() {
    let empty = RasterArray {
        shape: RasterShape::Grid {
            height: 0,
            width: 5,
        },
        samples: RasterSamples::U8(Vec::new()),
    };
    let (pipeline, _) = pipeline_with(Some(empty), ConversionConfig::default());

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(b"fake tiff data", OutputFormat::Png, &mut output);

    assert!(matches!(result, Err(ConversionError::InvalidDimensions(5, 0))));
}

#[test]
fn test_unknown_extension_without_forced_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.tif");
    std::fs::write(&input, b"fake tiff data").unwrap();
    let output = dir.path().join("out.webp");

    let (pipeline, written) = pipeline_with(None, ConversionConfig::default());
    let result = pipeline.convert_file(&input, &output);

    assert!(matches!(result, Err(ConversionError::UnsupportedFormat(_))));
    assert!(written.lock().unwrap().is_empty());
    assert!(!output.exists());
}

#[test]
fn test_forced_format_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.tif");
    std::fs::write(&input, b"fake tiff data").unwrap();
    let output = dir.path().join("out.webp");

    let config = ConversionConfig::builder()
        .force_format(Some(OutputFormat::Jpeg))
        .build();
    let (pipeline, written) = pipeline_with(None, config);
    let report = pipeline.convert_file(&input, &output).unwrap();

    assert_eq!(report.format, OutputFormat::Jpeg);
    assert_eq!(report.output_path.as_deref(), Some(output.as_path()));
    assert_eq!(written.lock().unwrap()[0].1, OutputFormat::Jpeg);
}

#[test]
fn test_run_report_mode_swallows_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.tif");
    let output = dir.path().join("out.png");

    let config = ConversionConfig::builder()
        .failure_mode(FailureMode::Report)
        .build();
    let (pipeline, _) = pipeline_with(None, config);

    assert!(pipeline.run(&missing, &output).is_ok());
    assert!(!output.exists());
}

#[test]
fn test_run_propagate_mode_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.tif");
    let output = dir.path().join("out.png");

    let (pipeline, _) = pipeline_with(None, ConversionConfig::default());
    let err = pipeline.run(&missing, &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Open);
}
