mod common;

use common::*;
use sizegauge::codec;

fn disk_data_url() -> anyhow::Result<String> {
    let img = disk_image(140, 140, (70, 70), 40);
    Ok(codec::encode_png(&img.to_rgb8())?.to_data_url())
}

#[test]
fn json_request_with_string_parameters() -> anyhow::Result<()> {
    let body = serde_json::json!({
        "image_data": disk_data_url()?,
        "threshold": "100",
        "blur_amount": "3",
        "pixel_ratio": "1.0",
    });
    let request: MeasureRequest = serde_json::from_value(body)?;
    let result = MeasurementPipeline::default().measure_request(&request);
    assert!(result.is_success(), "{:?}", result.error);

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["category"], "Large");
    assert_eq!(json["diameter_mm"], json["radius_pixels"].as_u64().unwrap() * 2);
    assert!(json["center_x"].is_u64());
    assert!(json["center_y"].is_u64());
    assert!(
        json["processed_image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    assert!(json.get("error").is_none());
    Ok(())
}

#[test]
fn request_parameters_override_pipeline_defaults() -> anyhow::Result<()> {
    let url = disk_data_url()?;
    let with_ratio = |ratio: f64| -> anyhow::Result<MeasurementResult> {
        let request: MeasureRequest =
            serde_json::from_value(serde_json::json!({ "image_data": url, "pixel_ratio": ratio }))?;
        Ok(MeasurementPipeline::default().measure_request(&request))
    };

    let coarse = with_ratio(1.0)?;
    let fine = with_ratio(0.25)?;
    assert_eq!(coarse.radius_pixels, fine.radius_pixels);
    assert!(coarse.diameter_mm > fine.diameter_mm);
    assert_eq!(fine.category, Category::Small);
    Ok(())
}

#[test]
fn malformed_parameter_is_reported_not_raised() -> anyhow::Result<()> {
    let request: MeasureRequest = serde_json::from_value(serde_json::json!({
        "image_data": disk_data_url()?,
        "blur_amount": "soft",
    }))?;
    let result = MeasurementPipeline::default().measure_request(&request);
    assert!(result.error.as_deref().unwrap().contains("blur"));
    assert_eq!(result.category, Category::None);

    let json = serde_json::to_value(&result)?;
    assert!(json["processed_image"].is_null());
    assert!(json.get("center_x").is_none());
    Ok(())
}

#[test]
fn negative_pixel_ratio_is_rejected() -> anyhow::Result<()> {
    let request: MeasureRequest = serde_json::from_value(serde_json::json!({
        "image_data": disk_data_url()?,
        "pixel_ratio": -1,
    }))?;
    let result = MeasurementPipeline::default().measure_request(&request);
    assert!(result.error.as_deref().unwrap().contains("pixel_ratio"));
    Ok(())
}
