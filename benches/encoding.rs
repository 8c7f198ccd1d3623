use image::{DynamicImage, Rgb, RgbImage};
use qrlogo::benchmark::time;
use qrlogo::{encode, overlay, render, ECLevel, LogoSize, RenderOptions};

const ITERS: u32 = 50;

fn main() {
    println!("Running qrlogo encoding benchmarks");
    println!("==================================\n");

    let payloads = [
        ("url", "https://example.com".to_string()),
        ("medium", "Hello, world! ".repeat(20)),
        ("max", "a".repeat(1273)),
    ];

    for (name, payload) in &payloads {
        for ecl in [ECLevel::L, ECLevel::H] {
            let Ok(qr) = encode(payload, ecl) else {
                println!("{name:>8} {ecl:?}: does not fit");
                continue;
            };
            let mean = time(ITERS, || {
                let _ = encode(payload, ecl);
            });
            println!("{name:>8} {ecl:?}: version {:>2} encoded in {mean:?}", *qr.version());
        }
    }

    let qr = match encode("https://example.com", ECLevel::H) {
        Ok(qr) => qr,
        Err(e) => return println!("{e}"),
    };
    let opts = RenderOptions::default();
    println!("\n  render: {:?}", time(ITERS, || {
        let _ = render(&qr, &opts);
    }));

    let Ok(base) = render(&qr, &opts) else { return };
    let logo = DynamicImage::ImageRgb8(RgbImage::from_pixel(512, 512, Rgb([200, 30, 30])));
    println!("  overlay: {:?}", time(ITERS, || {
        let _ = overlay(&base, &logo, LogoSize::default());
    }));
}
