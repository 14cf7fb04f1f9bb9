/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pixlab_benches::{sample_image, sample_size};
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::core_filters::colorspace::ColorspaceConv;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;
use pixlab_procs::manual_convert::{ManualGrayscale, ManualHsv};
use pixlab_procs::threshold::{ManualThreshold, Threshold, ThresholdMethod};

fn bench_pair<T, U>(
    c: &mut Criterion, name: &str, colorspace: ColorSpace, manual_fn: T, library_fn: U
) where
    T: Fn(&Image),
    U: Fn(&Image)
{
    let image = sample_image(colorspace);

    let mut group = c.benchmark_group(name);

    group.throughput(Throughput::Bytes(sample_size(colorspace)));

    group.bench_function("manual", |b| {
        b.iter(|| {
            manual_fn(&image);
            black_box(());
        })
    });

    group.bench_function("library", |b| {
        b.iter(|| {
            library_fn(&image);
            black_box(());
        })
    });
}

fn run(operation: &dyn OperationsTrait, image: &Image) {
    let im = operation.clone_and_execute(image).unwrap();
    black_box(im);
}

fn bench_threshold(c: &mut Criterion) {
    bench_pair(
        c,
        "manual-vs-library: threshold",
        ColorSpace::Luma,
        |im| run(&ManualThreshold::new(127, 255), im),
        |im| run(&Threshold::new(127.0, 255.0, ThresholdMethod::Binary), im)
    );
}

fn bench_grayscale(c: &mut Criterion) {
    bench_pair(
        c,
        "manual-vs-library: bgr to gray",
        ColorSpace::BGR,
        |im| run(&ManualGrayscale::new(), im),
        |im| run(&ColorspaceConv::new(ColorSpace::Luma), im)
    );
}

fn bench_hsv(c: &mut Criterion) {
    bench_pair(
        c,
        "manual-vs-library: bgr to hsv",
        ColorSpace::BGR,
        |im| run(&ManualHsv::new(), im),
        |im| run(&ColorspaceConv::new(ColorSpace::HSV), im)
    );
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
      };
    targets=bench_threshold,bench_grayscale,bench_hsv);

criterion_main!(benches);
