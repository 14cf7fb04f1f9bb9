/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Connected component labelling of binary images
//!
//! Non zero pixels are foreground. Label 0 is the background and
//! foreground components are numbered from 1 in raster order of their first pixel.
use std::cell::Cell;
use std::collections::VecDeque;

use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::debug;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

/// Which neighbours count as connected
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Connectivity {
    /// Up, down, left and right
    Four,
    /// Also the diagonals
    Eight
}

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &[(0, -1), (-1, 0), (1, 0), (0, 1)],
            Connectivity::Eight => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1)
            ]
        }
    }
}

/// Statistics of a single component
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComponentStats {
    /// Number of pixels
    pub area:     usize,
    pub left:     usize,
    pub top:      usize,
    pub width:    usize,
    pub height:   usize,
    /// Mean (x,y) of the component's pixels
    pub centroid: (f64, f64)
}

/// Result of labelling
#[derive(Clone, Debug)]
pub struct ComponentLabels {
    /// One label per pixel
    pub labels: Vec<u32>,
    /// Number of labels including the background
    pub count:  usize,
    /// Stats per label, index 0 is the background
    pub stats:  Vec<ComponentStats>
}

/// Label the connected components of a binary plane
pub fn label_components(
    binary: &[u8], width: usize, height: usize, connectivity: Connectivity
) -> ComponentLabels {
    let mut labels = vec![0_u32; binary.len()];
    let mut next_label = 1_u32;
    let mut queue = VecDeque::new();

    let offsets = connectivity.offsets();

    for start in 0..binary.len() {
        if binary[start] == 0 || labels[start] != 0 {
            continue;
        }
        labels[start] = next_label;
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            let (x, y) = ((pos % width) as isize, (pos / width) as isize);

            for (dx, dy) in offsets {
                let (nx, ny) = (x + dx, y + dy);

                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let next = ny as usize * width + nx as usize;

                if binary[next] != 0 && labels[next] == 0 {
                    labels[next] = next_label;
                    queue.push_back(next);
                }
            }
        }
        next_label += 1;
    }
    let count = next_label as usize;
    let stats = component_stats(&labels, width, count);

    ComponentLabels {
        labels,
        count,
        stats
    }
}

fn component_stats(labels: &[u32], width: usize, count: usize) -> Vec<ComponentStats> {
    // (area, min_x, min_y, max_x, max_y, sum_x, sum_y)
    let mut acc = vec![(0_usize, usize::MAX, usize::MAX, 0, 0, 0_usize, 0_usize); count];

    for (pos, label) in labels.iter().enumerate() {
        let (x, y) = (pos % width.max(1), pos / width.max(1));
        let entry = &mut acc[*label as usize];

        entry.0 += 1;
        entry.1 = entry.1.min(x);
        entry.2 = entry.2.min(y);
        entry.3 = entry.3.max(x);
        entry.4 = entry.4.max(y);
        entry.5 += x;
        entry.6 += y;
    }
    acc.iter()
        .map(|(area, min_x, min_y, max_x, max_y, sum_x, sum_y)| {
            if *area == 0 {
                return ComponentStats {
                    area:     0,
                    left:     0,
                    top:      0,
                    width:    0,
                    height:   0,
                    centroid: (0.0, 0.0)
                };
            }
            ComponentStats {
                area:     *area,
                left:     *min_x,
                top:      *min_y,
                width:    max_x - min_x + 1,
                height:   max_y - min_y + 1,
                centroid: (
                    *sum_x as f64 / *area as f64,
                    *sum_y as f64 / *area as f64
                )
            }
        })
        .collect()
}

/// Replace a binary grayscale image with its component labels,
/// stretched to `0..=255` so they can be viewed
///
/// The number of labels found, background included, can be read
/// back with [`count`](ConnectedComponents::count) after execution
#[derive(Debug)]
pub struct ConnectedComponents {
    connectivity: Connectivity,
    count:        Cell<usize>
}

impl ConnectedComponents {
    #[must_use]
    pub fn new(connectivity: Connectivity) -> ConnectedComponents {
        ConnectedComponents {
            connectivity,
            count: Cell::new(0)
        }
    }

    /// Number of labels from the last execution, background included
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl OperationsTrait for ConnectedComponents {
    fn name(&self) -> &'static str {
        "Connected Components"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();
        let channel = &mut image.channels_mut(false)[0];

        let components =
            label_components(channel.reinterpret_as::<u8>()?, width, height, self.connectivity);

        debug!("Found {} labels", components.count);
        self.count.set(components.count);

        let max_label = (components.count.saturating_sub(1)).max(1) as f32;
        let data = channel.reinterpret_as_mut::<u8>()?;

        for (out, label) in data.iter_mut().zip(&components.labels) {
            *out = (*label as f32 * 255.0 / max_label).round() as u8;
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &[ColorSpace::Luma]
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::connected_components::{label_components, ConnectedComponents, Connectivity};

    #[rustfmt::skip]
    const DIAGONAL: [u8; 16] = [
        1, 0, 0, 0,
        0, 1, 0, 0,
        0, 0, 0, 1,
        0, 0, 1, 1
    ];

    #[test]
    fn connectivity_matters() {
        let four = label_components(&DIAGONAL, 4, 4, Connectivity::Four);
        assert_eq!(four.count, 4);

        let eight = label_components(&DIAGONAL, 4, 4, Connectivity::Eight);
        // corner neighbours merge, leaving two blobs and the background
        assert_eq!(eight.count, 3);
        assert_eq!(eight.stats[1].area, 2);
        assert_eq!(eight.stats[2].area, 3);
        assert_eq!(eight.stats[0].area, 11);
    }

    #[test]
    fn stats_of_blob() {
        let labels = label_components(&DIAGONAL, 4, 4, Connectivity::Four);
        let blob = labels.stats[labels.labels[11] as usize];

        assert_eq!(blob.area, 3);
        assert_eq!((blob.left, blob.top, blob.width, blob.height), (2, 2, 2, 2));
        assert!((blob.centroid.0 - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_has_background_only() {
        let labels = label_components(&[0; 9], 3, 3, Connectivity::Eight);
        assert_eq!(labels.count, 1);
        assert!(labels.labels.iter().all(|x| *x == 0));
    }

    #[test]
    fn op_counts_labels() {
        let pixels: Vec<u8> = DIAGONAL.iter().map(|x| x * 255).collect();
        let mut image = Image::from_u8(&pixels, 4, 4, ColorSpace::Luma);
        let op = ConnectedComponents::new(Connectivity::Four);
        op.execute(&mut image).unwrap();

        assert_eq!(op.count(), 4);
        let out = image.flatten::<u8>().unwrap();
        assert_eq!(out[0], 85);
        assert_eq!(out[15], 255);
    }
}
