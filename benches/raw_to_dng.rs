use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use raw2dng::image_pipeline::{
    CfaLayout, ConversionConfig, CpuDebayer, DemosaicMethod, DngWriter, NegativeBuilder, Orientation,
    PreviewRenderer, RawImageData, StandardDngWriter,
};

fn generate_mock_raw(width: usize, height: usize) -> RawImageData {
    RawImageData {
        width,
        height,
        cpp: 1,
        data: (0..width * height).map(|i| ((i * 7) % 16384) as u16).collect(),
        bits_per_sample: 14,
        make: "SONY".to_string(),
        model: "ILCE-7RM4".to_string(),
        clean_make: "Sony".to_string(),
        clean_model: "ILCE-7RM4".to_string(),
        blacklevels: [512; 4],
        whitelevels: [16383; 4],
        wb_coeffs: [2.2, 1.0, 1.7, 0.0],
        xyz_to_cam: [
            [0.7662, -0.3686, -0.0262],
            [-0.5196, 1.3237, 0.2047],
            [-0.0840, 0.1768, 0.6537],
            [0.0, 0.0, 0.0],
        ],
        cam_to_xyz: [[0.6, 0.3, 0.1, 0.0], [0.25, 0.7, 0.05, 0.0], [0.0, 0.1, 0.9, 0.0]],
        crops: [8, 8, 8, 8],
        orientation: Orientation::Normal,
        cfa: CfaLayout::bayer([0, 1, 1, 2]),
    }
}

fn benchmark_write_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_dng_by_size");
    let config = ConversionConfig::default();

    for (width, height, label) in [(100, 100, "100x100"), (500, 500, "500x500"), (1000, 1000, "1000x1000")] {
        let raw = generate_mock_raw(width, height);
        let negative = NegativeBuilder::new(&config).build(&raw, "").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(label), &raw, |b, raw| {
            b.iter(|| {
                let mut output = Vec::new();
                let _ = StandardDngWriter.write_dng(black_box(raw), &negative, &[], &mut output);
            });
        });
    }

    group.finish();
}

fn benchmark_demosaic_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("demosaic_methods");
    let config = ConversionConfig::default();
    let raw = generate_mock_raw(500, 500);
    let negative = NegativeBuilder::new(&config).build(&raw, "").unwrap();

    for (method, label) in [
        (DemosaicMethod::NearestNeighbour, "nearest"),
        (DemosaicMethod::Linear, "linear"),
        (DemosaicMethod::Cubic, "cubic"),
    ] {
        group.bench_function(label, |b| {
            let debayer = CpuDebayer::new(method);
            b.iter(|| {
                let _ = debayer.process(black_box(&raw), &negative);
            });
        });
    }

    group.finish();
}

fn benchmark_previews(c: &mut Criterion) {
    let config = ConversionConfig::default();
    let raw = generate_mock_raw(1000, 1000);
    let negative = NegativeBuilder::new(&config).build(&raw, "").unwrap();
    let rendered = CpuDebayer::new(DemosaicMethod::Linear).process(&raw, &negative).unwrap();

    c.bench_function("render_previews", |b| {
        let renderer = PreviewRenderer::new(config.preview_size, config.thumbnail_size);
        b.iter(|| {
            let _ = renderer.render(black_box(&rendered));
        });
    });
}

criterion_group!(
    benches,
    benchmark_write_by_size,
    benchmark_demosaic_methods,
    benchmark_previews
);
criterion_main!(benches);
