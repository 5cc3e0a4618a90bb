//! Integration tests for the full read: rotate, crop, stages, overlay, assembly.
//!
//! Tests cover:
//! - Integer digits combined with dial fractions
//! - Previous-value correction end to end
//! - Every region attempted and drawn before the first error is raised
//! - Decimal digits taking precedence over dials
//! - Debug overlay output and image loading

mod common;

use meter_reader::detection::preprocessing;
use meter_reader::Stage;

use common::*;

const DIAL_ANGLES: [f64; 2] = [306.0, 198.0]; // 8.5 and 5.5

fn reader() -> MeterReader<GrayCodeRecognizer> {
    MeterReader::new(sample_config(), GrayCodeRecognizer)
}

/// Dial center in working-image coordinates
fn dial_center(config: &MeterConfig, index: usize) -> (u32, u32) {
    let region = config.decimal_analogs[index].region;
    let (cx, cy) = region.local_center();
    (region.x + cx, region.y + cy)
}

#[test]
fn test_reads_digits_and_dials() -> anyhow::Result<()> {
    let photo = sample_photo(&[Some(1), Some(2), Some(3), Some(4)], &DIAL_ANGLES);

    let reading = reader().read(&photo, None).result?;

    assert_eq!(reading.integer_digits, "1234");
    assert_eq!(reading.fractional_digits.as_deref(), Some("85"));
    assert_close(reading.value, 1234.85);
    Ok(())
}

#[test]
fn test_previous_value_corrects_ones_digit() -> anyhow::Result<()> {
    let photo = sample_photo(&[Some(1), Some(2), Some(3), Some(4)], &DIAL_ANGLES);

    let value = reader().process(&photo, Some(1233.5))?;

    assert_close(value, 1233.85);
    Ok(())
}

#[test]
fn test_unreadable_last_digit_reads_as_zero() -> anyhow::Result<()> {
    let photo = sample_photo(&[Some(1), Some(2), Some(3), None], &DIAL_ANGLES);

    let reading = reader().read(&photo, None).result?;

    assert_eq!(reading.integer_digits, "123?");
    assert_close(reading.value, 1230.85);
    Ok(())
}

#[test]
fn test_digit_failure_still_reads_every_dial() {
    let photo = sample_photo(&[Some(1), None, Some(3), Some(4)], &DIAL_ANGLES);
    let reader = reader();

    let outcome = reader.read(&photo, None);

    assert!(
        matches!(outcome.result, Err(ReadError::OcrFailure { region: 1, .. })),
        "expected OcrFailure, got {:?}",
        outcome.result
    );
    // Both dials were processed: outlined and given a needle
    for index in 0..2 {
        let region = reader.config().decimal_analogs[index].region;
        assert_eq!(*outcome.overlay.get_pixel(region.x, region.y), RED);
        let (cx, cy) = dial_center(reader.config(), index);
        assert_eq!(*outcome.overlay.get_pixel(cx, cy), GREEN);
    }
}

#[test]
fn test_first_dial_failure_wins_but_later_dials_are_drawn() {
    let config = sample_config();
    let crop = config.image.crop;
    let mut photo = sample_photo(&[Some(1), Some(2), Some(3), Some(4)], &[]);
    // Only the second dial has a needle
    let second = offset(&config.decimal_analogs[1].region, &crop);
    draw_needle(&mut photo, &second, 90.0, 18.0, RED);
    let reader = MeterReader::new(config, GrayCodeRecognizer);

    let outcome = reader.read(&photo, None);

    assert!(matches!(
        outcome.result,
        Err(ReadError::ColorNotFound { color: "red" })
    ));
    let (cx, cy) = dial_center(reader.config(), 1);
    assert_eq!(*outcome.overlay.get_pixel(cx, cy), GREEN);
}

#[test]
fn test_decimal_digits_take_precedence_over_dials() -> anyhow::Result<()> {
    let mut config = sample_config();
    config.decimal_digits = vec![Region::new(0, 40, 20, 30), Region::new(20, 40, 20, 30)];
    let crop = config.image.crop;
    // No needles: the dials would fail if they were read
    let mut photo = sample_photo(&[Some(1), Some(2), Some(3), Some(4)], &[]);
    paint_digit(&mut photo, &offset(&config.decimal_digits[0], &crop), 8);
    paint_digit(&mut photo, &offset(&config.decimal_digits[1], &crop), 5);
    let first_dial = config.decimal_analogs[0].region;
    let reader = MeterReader::new(config, GrayCodeRecognizer);

    let outcome = reader.read(&photo, None);
    let reading = outcome.result?;

    assert_eq!(reading.fractional_digits.as_deref(), Some("85"));
    assert_close(reading.value, 1234.85);
    // Dials were never touched
    assert_eq!(*outcome.overlay.get_pixel(first_dial.x, first_dial.y), WHITE);
    Ok(())
}

#[test]
fn test_failed_decimal_digits_fall_back_to_dials_and_report_error() {
    let mut config = sample_config();
    config.decimal_digits = vec![Region::new(0, 40, 20, 30), Region::new(20, 40, 20, 30)];
    let photo = sample_photo(&[Some(1), Some(2), Some(3), Some(4)], &DIAL_ANGLES);
    let reader = MeterReader::new(config, GrayCodeRecognizer);

    let outcome = reader.read(&photo, None);

    assert!(matches!(
        outcome.result,
        Err(ReadError::OcrFailure { region: 0, .. })
    ));
    let (cx, cy) = dial_center(reader.config(), 0);
    assert_eq!(*outcome.overlay.get_pixel(cx, cy), GREEN);
}

#[test]
fn test_rotation_is_applied_before_crop() -> anyhow::Result<()> {
    let upright = sample_photo(&[Some(9), Some(0), Some(1), Some(7)], &DIAL_ANGLES);
    let upside_down = preprocessing::rotate_about_center(&upright, 180.0);
    let mut config = sample_config();
    config.image.rotate = 180.0;
    let reader = MeterReader::new(config, GrayCodeRecognizer);

    let value = reader.process(&upside_down, None)?;

    assert_close(value, 9017.85);
    Ok(())
}

#[test]
fn test_process_is_deterministic() -> anyhow::Result<()> {
    let photo = sample_photo(&[Some(5), Some(5), Some(0), Some(2)], &DIAL_ANGLES);
    let reader = reader();

    let first = reader.process(&photo, Some(5501.9))?;
    let second = reader.process(&photo, Some(5501.9))?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_debug_overlay_written_even_on_failure() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let overlay_path = dir.path().join("debug").join("overlay.png");
    let photo = sample_photo(&[None, None, None, None], &DIAL_ANGLES);
    let reader = reader().with_debug(overlay_path.clone())?;

    let result = reader.process(&photo, None);

    assert!(matches!(result, Err(ReadError::OcrFailure { region: 0, .. })));
    let saved = image::open(&overlay_path)?.to_rgb8();
    assert_eq!(saved.dimensions(), (180, 80));
    Ok(())
}

#[test]
fn test_process_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let photo_path = dir.path().join("meter.png");
    sample_photo(&[Some(1), Some(2), Some(3), Some(4)], &DIAL_ANGLES).save(&photo_path)?;

    let value = reader().process_file(&photo_path, None)?;
    assert_close(value, 1234.85);

    let missing = reader().process_file(&dir.path().join("missing.png"), None);
    assert!(matches!(missing, Err(ReadError::ImageLoad { .. })));
    Ok(())
}

#[test]
fn test_stage_names() {
    assert_eq!(Stage::Digits.name(), "digits");
    assert_eq!(Stage::DecimalAnalogs.name(), "decimal analogs");
}
