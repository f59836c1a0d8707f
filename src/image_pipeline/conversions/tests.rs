#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use crate::image_pipeline::common::error::{ConversionError, Result};
    use crate::image_pipeline::conversions::{
        ConversionConfig, DemosaicMethod, DngConverter, RawConverter, RawToDngPipeline, run_conversion,
    };
    use crate::image_pipeline::dng::StandardDngWriter;
    use crate::image_pipeline::raw::{CfaLayout, Orientation, RawImageData, RawImageReader};
    use crate::image_pipeline::test_support::{ifd_entries, ifd_offsets};

    type StepLog = Arc<Mutex<Vec<&'static str>>>;

    struct MockConverter {
        fail_at: Option<&'static str>,
        log: StepLog,
    }

    impl MockConverter {
        fn step(&self, name: &'static str) -> Result<()> {
            self.log.lock().unwrap().push(name);
            if self.fail_at == Some(name) {
                return Err(ConversionError::RenderError(format!("mock failure in {}", name)));
            }
            Ok(())
        }
    }

    impl RawConverter for MockConverter {
        fn open_raw_file(&mut self, _path: &Path) -> Result<()> {
            self.step("open_raw_file")
        }
        fn build_negative(&mut self, profile: &str) -> Result<()> {
            assert!(profile.is_empty());
            self.step("build_negative")
        }
        fn render_image(&mut self) -> Result<()> {
            self.step("render_image")
        }
        fn render_previews(&mut self) -> Result<()> {
            self.step("render_previews")
        }
        fn write_dng(&mut self, _path: &Path) -> Result<()> {
            self.step("write_dng")
        }
    }

    impl Drop for MockConverter {
        fn drop(&mut self) {
            if let Ok(mut log) = self.log.lock() {
                log.push("drop");
            }
        }
    }

    struct MockReader {
        should_fail: bool,
        mock_data: Option<RawImageData>,
    }

    impl RawImageReader for MockReader {
        fn read_raw(&self, _data: &[u8]) -> Result<RawImageData> {
            if self.should_fail {
                return Err(ConversionError::DecodeError("Mock decode error".to_string()));
            }
            Ok(self.mock_data.clone().unwrap_or_else(|| synthetic_raw(64, 48)))
        }
    }

    fn synthetic_raw(width: usize, height: usize) -> RawImageData {
        RawImageData {
            width,
            height,
            cpp: 1,
            data: (0..width * height).map(|i| (i % 4096) as u16).collect(),
            bits_per_sample: 12,
            make: "Canon".to_string(),
            model: "Canon EOS 5D Mark IV".to_string(),
            clean_make: "Canon".to_string(),
            clean_model: "EOS 5D Mark IV".to_string(),
            blacklevels: [128; 4],
            whitelevels: [4095; 4],
            wb_coeffs: [2.1, 1.0, 1.6, f32::NAN],
            xyz_to_cam: [
                [0.6446, -0.0366, -0.0864],
                [-0.4436, 1.2204, 0.2513],
                [-0.0952, 0.2496, 0.6348],
                [0.0, 0.0, 0.0],
            ],
            cam_to_xyz: [
                [0.5, 0.3, 0.2, 0.0],
                [0.2, 0.7, 0.1, 0.0],
                [0.0, 0.1, 0.9, 0.0],
            ],
            crops: [2, 2, 2, 2],
            orientation: Orientation::Normal,
            cfa: CfaLayout::bayer([0, 1, 1, 2]),
        }
    }

    fn mock_pipeline(should_fail: bool) -> RawToDngPipeline<MockReader, StandardDngWriter> {
        let reader = MockReader { should_fail, mock_data: None };
        let config = ConversionConfig::builder().preview_size(32).thumbnail_size(8).build();
        RawToDngPipeline::with_custom(reader, StandardDngWriter, config)
    }

    fn new_log() -> StepLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_config_builder() {
        let config = ConversionConfig::builder()
            .validate_dimensions(false)
            .max_dimension(Some(10000))
            .demosaic(DemosaicMethod::Cubic)
            .preview_size(512)
            .thumbnail_size(128)
            .build();

        assert!(!config.validate_dimensions);
        assert_eq!(config.max_dimension, Some(10000));
        assert_eq!(config.demosaic, DemosaicMethod::Cubic);
        assert_eq!(config.preview_size, 512);
        assert_eq!(config.thumbnail_size, 128);
    }

    #[test]
    fn test_steps_run_in_order() {
        let log = new_log();
        let converter = MockConverter { fail_at: None, log: log.clone() };

        let result = run_conversion(converter, Path::new("in.cr2"), Path::new("out.dng"));

        assert!(result.is_ok());
        assert_eq!(
            *log.lock().unwrap(),
            vec!["open_raw_file", "build_negative", "render_image", "render_previews", "write_dng", "drop"]
        );
    }

    #[test]
    fn test_no_step_runs_after_failure() {
        for (fail_at, ran) in [
            ("open_raw_file", 1),
            ("build_negative", 2),
            ("render_image", 3),
            ("render_previews", 4),
            ("write_dng", 5),
        ] {
            let log = new_log();
            let converter = MockConverter { fail_at: Some(fail_at), log: log.clone() };

            let result = run_conversion(converter, Path::new("in.cr2"), Path::new("out.dng"));

            assert!(result.unwrap_err().to_string().contains(fail_at));
            let steps = log.lock().unwrap();
            assert_eq!(steps.len(), ran + 1, "steps after {}: {:?}", fail_at, steps);
            assert_eq!(steps[ran - 1], fail_at);
            assert_eq!(steps[ran], "drop");
        }
    }

    #[test]
    fn test_successful_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("IMG_0001.CR2");
        let output = dir.path().join("IMG_0001.dng");
        std::fs::write(&input, b"fake raw data").unwrap();

        mock_pipeline(false).convert_file(&input, &output).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert!(!bytes.is_empty());
        // raw, preview and thumbnail
        assert_eq!(ifd_offsets(&bytes).len(), 3);

        let ifd0 = ifd_entries(&bytes, 0);
        assert_eq!(ifd0[&256].value, 64);
        assert_eq!(ifd0[&257].value, 48);
        assert_eq!(ifd0[&50706].count, 4);

        let preview = ifd_entries(&bytes, 1);
        assert_eq!(preview[&256].value, 32);
        assert_eq!(preview[&257].value, 23);
        let thumbnail = ifd_entries(&bytes, 2);
        assert_eq!(thumbnail[&256].value, 8);
    }

    #[test]
    fn test_repeated_conversions_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("DSC_0001.NEF");
        let first = dir.path().join("first.dng");
        let second = dir.path().join("second.dng");
        std::fs::write(&input, b"fake raw data").unwrap();

        let pipeline = mock_pipeline(false);
        pipeline.convert_file(&input, &first).unwrap();
        pipeline.convert_file(&input, &second).unwrap();

        let first_bytes = std::fs::read(&first).unwrap();
        let second_bytes = std::fs::read(&second).unwrap();
        assert!(!first_bytes.is_empty());
        assert_eq!(first_bytes, second_bytes);

        std::fs::remove_file(&first).unwrap();
        assert!(second.exists());
    }

    #[test]
    fn test_reader_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.arw");
        let output = dir.path().join("broken.dng");
        std::fs::write(&input, b"corrupt").unwrap();

        let result = mock_pipeline(true).convert_file(&input, &output);

        assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.dng");

        let result = mock_pipeline(false).convert_file(dir.path().join("nope.arw"), &output);

        assert!(matches!(result.unwrap_err(), ConversionError::InputReadError(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("IMG_0002.CR2");
        std::fs::write(&input, b"fake raw data").unwrap();
        let output = dir.path().join("no_such_dir").join("IMG_0002.dng");

        let err = mock_pipeline(false).convert_file(&input, &output).unwrap_err();

        assert!(matches!(err, ConversionError::OutputWriteError(_)));
        assert!(err.to_string().contains("no_such_dir"));
        assert!(!output.exists());
    }

    #[test]
    fn test_dimension_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("huge.cr2");
        let output = dir.path().join("huge.dng");
        std::fs::write(&input, b"fake raw data").unwrap();

        let reader = MockReader { should_fail: false, mock_data: Some(synthetic_raw(64, 48)) };
        let config = ConversionConfig::builder().max_dimension(Some(32)).build();
        let pipeline = RawToDngPipeline::with_custom(reader, StandardDngWriter, config);

        let result = pipeline.convert_file(&input, &output);

        assert!(matches!(result.unwrap_err(), ConversionError::InvalidDimensions(64, 48)));
        assert!(!output.exists());
    }

    #[test]
    fn test_four_color_cfa_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cygm.crw");
        let output = dir.path().join("cygm.dng");
        std::fs::write(&input, b"fake raw data").unwrap();

        let mut raw = synthetic_raw(64, 48);
        raw.cfa = CfaLayout::bayer([2, 3, 1, 0]);
        let reader = MockReader { should_fail: false, mock_data: Some(raw) };
        let pipeline = RawToDngPipeline::with_custom(reader, StandardDngWriter, ConversionConfig::default());

        let result = pipeline.convert_file(&input, &output);

        assert!(matches!(result.unwrap_err(), ConversionError::UnsupportedFormat(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_steps_out_of_order() {
        let reader = MockReader { should_fail: false, mock_data: None };
        let mut converter = DngConverter::with_custom(reader, StandardDngWriter, ConversionConfig::default());

        let err = converter.render_image().unwrap_err();
        assert!(matches!(
            err,
            ConversionError::StepOutOfOrder { step: "render_image", requires: "open_raw_file" }
        ));

        let err = converter.write_dng(Path::new("never.dng")).unwrap_err();
        assert!(matches!(err, ConversionError::StepOutOfOrder { step: "write_dng", .. }));
        assert!(!Path::new("never.dng").exists());
    }

    #[test]
    fn test_set_config() {
        let mut pipeline = mock_pipeline(false);
        pipeline.set_config(ConversionConfig::builder().preview_size(2048).build());
        assert_eq!(pipeline.config().preview_size, 2048);
    }
}
