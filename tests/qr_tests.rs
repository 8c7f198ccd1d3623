use image::{DynamicImage, GrayImage};
use test_case::test_case;

use qrlogo::*;

fn to_gray(qr: &QR) -> GrayImage {
    let opts = RenderOptions { module_size: 3, quiet_zone: 4, ..Default::default() };
    DynamicImage::ImageRgb8(render(qr, &opts).unwrap()).to_luma8()
}

fn decode(qr: &QR) -> (usize, String) {
    let mut img = rqrr::PreparedImage::prepare(to_gray(qr));
    let grids = img.detect_grids();
    assert_eq!(grids.len(), 1);
    let (meta, content) = grids[0].decode().expect("Failed to read QR");
    (meta.version.0, content)
}

#[test_case("https://example.com", ECLevel::H, 3)]
#[test_case("HELLO", ECLevel::H, 1)]
#[test_case("Hello, world! 🌎", ECLevel::L, 2)]
#[test_case("Hello, world! 🌎", ECLevel::H, 3)]
#[test_case(&"https://example.com/".repeat(10), ECLevel::M, 10)]
fn test_encode_round_trip(payload: &str, ecl: ECLevel, version: usize) {
    let qr = encode(payload, ecl).unwrap();
    assert_eq!(*qr.version(), version);
    assert_eq!(qr.width(), 17 + 4 * version);
    assert_eq!(decode(&qr), (version, payload.to_string()));
}

#[test]
fn test_scenario_url() {
    let img = Generator::default().generate("https://example.com", None).unwrap();
    // 29 modules plus 2 on each side at 10 px
    assert_eq!(img.dimensions(), (330, 330));

    let gray = DynamicImage::ImageRgb8(img).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();
    let (_, content) = grids[0].decode().unwrap();
    assert_eq!(content, "https://example.com");
}

#[test]
fn test_scenario_empty_payload() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.png");
    for payload in ["", "   ", "\n\t"] {
        let res = Generator::default().generate_to(payload, None, &target);
        assert_eq!(res, Err(QRError::EmptyPayload));
    }
    assert!(!target.exists());
}

#[test]
fn test_scenario_oversized_payload() {
    let payload = "a".repeat(3000);
    let res = encode(&payload, ECLevel::H);
    assert_eq!(res, Err(QRError::PayloadTooLarge { len: 3000, ec_level: ECLevel::H }));
    assert!(Generator::default().generate(&payload, None).is_err());
}

#[test]
fn test_byte_capacity_limit_at_h() {
    let qr = encode(&"a".repeat(1273), ECLevel::H).unwrap();
    assert_eq!(qr.version(), Version::MAX);
    assert_eq!(qr.width(), 177);
    assert!(matches!(
        encode(&"a".repeat(1274), ECLevel::H),
        Err(QRError::PayloadTooLarge { len: 1274, .. })
    ));
}

#[test]
fn test_capacity_decreases_with_ec_level() {
    let payload = "x".repeat(200);
    let versions: Vec<usize> = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H]
        .into_iter()
        .map(|ecl| *encode(&payload, ecl).unwrap().version())
        .collect();
    assert!(versions.windows(2).all(|w| w[0] <= w[1]), "{versions:?}");
}

#[test]
fn test_forced_version_too_small() {
    let res = QRBuilder::new(b"https://example.com").version(Version::new(1).unwrap()).build();
    assert!(matches!(res, Err(QRError::PayloadTooLarge { .. })));
}

#[cfg(test)]
mod qr_proptests {
    use prop::string::string_regex;
    use proptest::prelude::*;

    use qrlogo::*;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    pub fn payload_strategy(max_sz: usize) -> impl Strategy<Value = String> {
        string_regex(&format!(r"[ -~]{{1,{max_sz}}}")).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn proptest_minimal_version(ecl in ec_level_strategy(), data in payload_strategy(300)) {
            let qr = encode(&data, ecl).unwrap();
            let ver = *qr.version();
            prop_assert_eq!(qr.width(), 17 + 4 * ver);

            if ver > 1 {
                let smaller = Version::new(ver - 1).unwrap();
                let res = QRBuilder::new(data.as_bytes()).version(smaller).ec_level(ecl).build();
                let is_too_large = matches!(res, Err(QRError::PayloadTooLarge { .. }));
                prop_assert!(is_too_large);
            }
        }

        #[test]
        fn proptest_idempotent(ecl in ec_level_strategy(), data in payload_strategy(120)) {
            let a = encode(&data, ecl).unwrap();
            let b = encode(&data, ecl).unwrap();
            prop_assert_eq!(a.mask(), b.mask());
            prop_assert_eq!(a, b);
        }

        #[test]
        #[ignore]
        fn proptest_round_trip(ecl in ec_level_strategy(), data in payload_strategy(1273)) {
            let qr = encode(&data, ecl).unwrap();
            let opts = RenderOptions { module_size: 3, quiet_zone: 4, ..Default::default() };
            let gray = image::DynamicImage::ImageRgb8(render(&qr, &opts).unwrap()).to_luma8();
            let mut img = rqrr::PreparedImage::prepare(gray);
            let grids = img.detect_grids();
            let (_meta, decoded) = grids[0].decode().expect("Failed to read QR");

            prop_assert_eq!(data, decoded);
        }
    }
}
