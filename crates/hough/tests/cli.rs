#![cfg(feature = "cli")]

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use std::path::Path;

fn write_lines_image(path: &Path) {
    let img = GrayImage::from_fn(64, 48, |x, y| {
        if x == 20 || y == 30 {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    img.save(path).unwrap();
}

fn write_ring_image(path: &Path) {
    let img = GrayImage::from_fn(64, 64, |x, y| {
        let d = ((x as f64 - 32.0).powi(2) + (y as f64 - 32.0).powi(2)).sqrt();
        if (d - 10.0).abs() < 0.5 {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    img.save(path).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn lines_command_reports_both_lines() {
    let dir = tempfile::tempdir().unwrap();
    let img = dir.path().join("lines.png");
    let out = dir.path().join("report.json");
    let overlay = dir.path().join("overlay.png");
    write_lines_image(&img);

    Command::cargo_bin("hough")
        .unwrap()
        .arg("lines")
        .arg("--image")
        .arg(&img)
        .arg("--out")
        .arg(&out)
        .arg("--overlay")
        .arg(&overlay)
        .args(["--num-peaks", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rho=30.0 theta=90.0"))
        .stdout(predicate::str::contains("rho=20.0 theta=0.0"));

    let report = read_json(&out);
    assert_eq!(report["width"], 64);
    assert_eq!(report["height"], 48);
    assert_eq!(report["edge_pixels"], 64 + 48 - 1);
    assert_eq!(report["lines"]["lines"].as_array().unwrap().len(), 2);
    assert!(overlay.exists());
}

#[test]
fn explicit_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let img = dir.path().join("lines.png");
    let cfg_path = dir.path().join("cfg.json");
    let out = dir.path().join("report.json");
    write_lines_image(&img);

    let cfg = serde_json::json!({
        "image_path": img.to_string_lossy(),
        "output_path": out.to_string_lossy(),
        "lines": { "peaks": { "num_peaks": 1 } }
    });
    std::fs::write(&cfg_path, cfg.to_string()).unwrap();

    Command::cargo_bin("hough")
        .unwrap()
        .args(["lines", "--config"])
        .arg(&cfg_path)
        .assert()
        .success();
    assert_eq!(read_json(&out)["lines"]["lines"].as_array().unwrap().len(), 1);

    Command::cargo_bin("hough")
        .unwrap()
        .args(["lines", "--config"])
        .arg(&cfg_path)
        .args(["--num-peaks", "2"])
        .assert()
        .success();
    assert_eq!(read_json(&out)["lines"]["lines"].as_array().unwrap().len(), 2);
}

#[test]
fn circles_command_finds_ring_center() {
    let dir = tempfile::tempdir().unwrap();
    let img = dir.path().join("ring.png");
    let out = dir.path().join("report.json");
    write_ring_image(&img);

    Command::cargo_bin("hough")
        .unwrap()
        .arg("circles")
        .arg("--image")
        .arg(&img)
        .arg("--out")
        .arg(&out)
        .args(["--radii", "9,10,11", "--full-sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("r=10"));

    let report = read_json(&out);
    let circles = report["circles"]["circles"].as_array().unwrap();
    let best = circles
        .iter()
        .max_by_key(|c| c["votes"].as_u64().unwrap())
        .unwrap();
    assert_eq!(best["radius"], 10.0);
    let cx = best["center"][0].as_f64().unwrap();
    let cy = best["center"][1].as_f64().unwrap();
    assert!((cx - 32.0).abs() <= 1.0 && (cy - 32.0).abs() <= 1.0);
}

#[test]
fn circles_without_radii_fails_and_records_error() {
    let dir = tempfile::tempdir().unwrap();
    let img = dir.path().join("ring.png");
    write_ring_image(&img);

    Command::cargo_bin("hough")
        .unwrap()
        .current_dir(dir.path())
        .arg("circles")
        .arg("--image")
        .arg(&img)
        .assert()
        .failure()
        .stderr(predicate::str::contains("radius list is empty"));

    let report = read_json(&dir.path().join("hough_report.json"));
    assert!(report["error"].as_str().unwrap().contains("radius list is empty"));
}

#[test]
fn missing_image_and_config_is_rejected() {
    Command::cargo_bin("hough")
        .unwrap()
        .arg("lines")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--image or --config"));
}

#[test]
fn filter_flags_drop_isolated_line() {
    let dir = tempfile::tempdir().unwrap();
    let img_path = dir.path().join("bars.png");
    let out = dir.path().join("report.json");
    let img = GrayImage::from_fn(64, 48, |x, y| {
        if x == 20 || x == 26 || y == 30 {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    img.save(&img_path).unwrap();

    Command::cargo_bin("hough")
        .unwrap()
        .arg("lines")
        .arg("--image")
        .arg(&img_path)
        .arg("--out")
        .arg(&out)
        .args(["--num-peaks", "3", "--filter", "--theta-hood", "3", "--rho-hood", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rho=20.0 theta=0.0"))
        .stdout(predicate::str::contains("rho=26.0 theta=0.0"))
        .stdout(predicate::str::contains("theta=90.0").not());

    let report = read_json(&out);
    assert_eq!(report["lines"]["raw_peaks"].as_array().unwrap().len(), 3);
    assert_eq!(report["lines"]["peaks"].as_array().unwrap().len(), 2);
}
