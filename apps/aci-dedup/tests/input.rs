use serde_json::json;

use aci_config::Intake;
use aci_domain::InsightResults;

#[test]
fn admits_valid_insights_and_skips_rejections() {
	let raw = json!([
		{
			"INSIGHT": "Founder-led selfie videos beat agency-produced spots for DTC coffee brands",
			"RESULTS": { "metrics": "CTR 2.4x", "context": "TikTok" },
			"LIMITATIONS_CONTEXT": "Single brand test",
			"DIFFERENCE_SCORE": "88",
		},
		{
			"INSIGHT": "Too short.",
			"RESULTS": "",
			"LIMITATIONS_CONTEXT": "",
			"DIFFERENCE_SCORE": 10,
		},
		{
			"RESULTS": "No insight at all",
			"LIMITATIONS_CONTEXT": "",
			"DIFFERENCE_SCORE": 10,
		},
	])
	.to_string();
	let records = aci_dedup::admit_all(&raw, &Intake::default()).expect("Failed to admit input.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].difference_score, 88);
	assert!(matches!(records[0].results, InsightResults::Fields(_)));
}

#[test]
fn non_array_input_is_an_error() {
	let raw = json!({ "INSIGHT": "not wrapped in an array" }).to_string();

	assert!(aci_dedup::admit_all(&raw, &Intake::default()).is_err());
}
