//! Background photo loader.
//!
//! A marquee asks for a whole set of photos at once. The set is fetched and
//! decoded in parallel on a worker thread and reported back as one batch,
//! after every photo has either loaded or failed. Batches carry the
//! generation of the request that produced them so the receiver can drop
//! answers to requests it has since abandoned.

use std::sync::mpsc;

use rayon::prelude::*;

use super::fetch::fetch_bytes;
use crate::error::{AtlasError, Result};

/// Decoded image data (RGBA).
#[derive(Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub generation: u64,
    pub urls: Vec<String>,
}

/// Outcome of one request. `loaded` keeps request order.
#[derive(Debug)]
pub struct LoadBatch {
    pub generation: u64,
    pub loaded: Vec<(String, ImageData)>,
    pub failed: usize,
}

/// Runs load requests off the UI thread.
pub struct ImageLoader {
    max_height: u32,
    tx: mpsc::Sender<LoadBatch>,
    rx: mpsc::Receiver<LoadBatch>,
    in_flight: usize,
}

impl ImageLoader {
    /// Images taller than `max_height` are scaled down on decode.
    pub fn new(max_height: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            max_height: max_height.max(1),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, request: LoadRequest) {
        let tx = self.tx.clone();
        let max_height = self.max_height;
        self.in_flight += 1;
        log::debug!(
            "loading {} photos (generation {})",
            request.urls.len(),
            request.generation
        );
        std::thread::spawn(move || {
            let _ = tx.send(load_batch(&request, max_height));
        });
    }

    /// Drain finished batches. Call every frame.
    pub fn poll(&mut self) -> Vec<LoadBatch> {
        let batches: Vec<LoadBatch> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(batches.len());
        batches
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Fetch and decode every URL of `request`, returning once all have settled.
pub fn load_batch(request: &LoadRequest, max_height: u32) -> LoadBatch {
    let results: Vec<(String, Result<ImageData>)> = request
        .urls
        .par_iter()
        .map(|url| (url.clone(), fetch_and_decode(url, max_height)))
        .collect();

    let mut loaded = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (url, result) in results {
        match result {
            Ok(data) => loaded.push((url, data)),
            Err(e) => {
                log::warn!("photo failed: {}", e);
                failed += 1;
            }
        }
    }

    LoadBatch {
        generation: request.generation,
        loaded,
        failed,
    }
}

fn fetch_and_decode(url: &str, max_height: u32) -> Result<ImageData> {
    let bytes = fetch_bytes(url)?;
    let img = image::load_from_memory(&bytes).map_err(|source| AtlasError::Image {
        url: url.to_string(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (w, h, pixels) = if h > max_height {
        let ratio = max_height as f32 / h as f32;
        let new_w = ((w as f32 * ratio) as u32).max(1);
        let resized = image::imageops::resize(
            &rgba,
            new_w,
            max_height,
            image::imageops::FilterType::Triangle,
        );
        let (rw, rh) = resized.dimensions();
        (rw, rh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Ok(ImageData {
        width: w,
        height: h,
        rgba: pixels,
    })
}
