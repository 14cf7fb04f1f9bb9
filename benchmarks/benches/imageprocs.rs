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
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;
use pixlab_procs::bilateral_filter::BilateralFilter;
use pixlab_procs::blemish::BlemishRemoval;
use pixlab_procs::focus::FocusMeasure;
use pixlab_procs::gaussian_blur::GaussianBlur;
use pixlab_procs::instagram::PencilSketch;
use pixlab_procs::median::Median;
use pixlab_procs::sobel::Sobel;

fn bench_inner<T>(c: &mut Criterion, name: &str, colorspace: ColorSpace, func: T)
where
    T: Fn(&Image)
{
    let image = sample_image(colorspace);

    let mut group = c.benchmark_group(name);

    group.throughput(Throughput::Bytes(sample_size(colorspace)));

    group.bench_function("pixlab", |b| {
        b.iter(|| {
            func(&image);
            black_box(());
        })
    });
}

fn run(operation: &dyn OperationsTrait, image: &Image) {
    let im = operation.clone_and_execute(image).unwrap();
    black_box(im);
}

fn bench_gaussian(c: &mut Criterion) {
    bench_inner(c, "imageprocs: gaussian blur", ColorSpace::BGR, |im| {
        run(&GaussianBlur::new(7, 0.0), im)
    });
}

fn bench_median(c: &mut Criterion) {
    bench_inner(c, "imageprocs: median", ColorSpace::BGR, |im| run(&Median::new(5), im));
}

fn bench_bilateral(c: &mut Criterion) {
    bench_inner(c, "imageprocs: bilateral", ColorSpace::BGR, |im| {
        run(&BilateralFilter::new(7, 75.0, 75.0), im)
    });
}

fn bench_sobel(c: &mut Criterion) {
    bench_inner(c, "imageprocs: sobel", ColorSpace::Luma, |im| run(&Sobel::new(), im));
}

fn bench_blemish(c: &mut Criterion) {
    bench_inner(c, "imageprocs: blemish removal", ColorSpace::BGR, |im| {
        run(&BlemishRemoval::new(640, 360, 15), im)
    });
}

fn bench_pencil_sketch(c: &mut Criterion) {
    bench_inner(c, "imageprocs: pencil sketch", ColorSpace::BGR, |im| {
        run(&PencilSketch::default(), im)
    });
}

fn bench_focus(c: &mut Criterion) {
    bench_inner(c, "imageprocs: focus measure", ColorSpace::Luma, |im| {
        black_box(FocusMeasure::VarAbsLaplacian.measure(im).unwrap());
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
      };
    targets=bench_gaussian,bench_median,bench_bilateral,bench_sobel,bench_blemish,bench_pencil_sketch,bench_focus);

criterion_main!(benches);
