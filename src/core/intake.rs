//! Turns structured intake (medications, symptoms, conditions) into the
//! free-text summaries stored on a patient or sent for adverse-event
//! detection.

use std::collections::BTreeMap;

use serde_json::Value;

/// Phrases each medication is expanded into, in output order.
const MEDICATION_PHRASES: [&str; 11] = [
    "started",
    "began",
    "prescribed",
    "initiated",
    "stopped",
    "discontinued",
    "withdrew",
    "cessation of",
    "after",
    "following",
    "subsequent to",
];

/// Builds the `drugUsage` text for a new patient.
///
/// Medications come first, then symptoms, then conditions. Empty groups add
/// nothing, so the result never carries stray spaces.
pub fn drug_usage(medications: &[String], symptoms: &[String], conditions: &[String]) -> String {
    let medication_text = medications
        .iter()
        .flat_map(|med| MEDICATION_PHRASES.iter().map(move |p| format!("{} {}", p, med)));
    let symptom_text = symptoms.iter().map(|s| format!("experiencing {}", s));
    let condition_text = conditions.iter().map(|c| format!("suffering from {}", c));

    medication_text
        .chain(symptom_text)
        .chain(condition_text)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Raw intake posted to the adverse-event forwarding endpoint.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionIntake {
    pub patient_id: Value,
    pub hospital_id: Value,
    pub full_name: Value,
    pub age: Value,
    /// Medication name to status, e.g. `{"Aspirin": "started"}`.
    pub medications: BTreeMap<String, Value>,
    pub symptoms: Value,
    pub conditions: Value,
}

impl DetectionIntake {
    /// Flattens the intake into the single line the detection service reads.
    pub fn clinical_text(&self) -> String {
        let medications = self
            .medications
            .iter()
            .map(|(name, status)| format!("{}: {}", name, render(status)))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Patient ID: {}, Hospital ID: {}, Name: {}, Age: {}, Medications: {}, Symptoms: {}, Conditions: {}",
            render(&self.patient_id),
            render(&self.hospital_id),
            render(&self.full_name),
            render(&self.age),
            medications,
            render(&self.symptoms),
            render(&self.conditions),
        )
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_intake_orders_groups() {
        let text = drug_usage(
            &strings(&["Aspirin"]),
            &strings(&["Headache"]),
            &strings(&["Hypertension"]),
        );
        assert!(text.starts_with("started Aspirin began Aspirin prescribed Aspirin"));
        assert!(text.contains("subsequent to Aspirin experiencing Headache"));
        assert!(text.ends_with("experiencing Headache suffering from Hypertension"));
    }

    #[test]
    fn each_medication_expands_to_every_phrase() {
        let text = drug_usage(&strings(&["Metformin", "Valsartan"]), &[], &[]);
        assert_eq!(text.matches("Metformin").count(), 11);
        assert_eq!(text.matches("Valsartan").count(), 11);
        assert!(text.contains("subsequent to Metformin started Valsartan"));
    }

    #[test_case(&[], &["Nausea"], &[], "experiencing Nausea" ; "symptoms only")]
    #[test_case(&[], &[], &["Asthma", "Gout"], "suffering from Asthma suffering from Gout" ; "conditions only")]
    #[test_case(&[], &["Rash"], &["Eczema"], "experiencing Rash suffering from Eczema" ; "no medications")]
    #[test_case(&[], &[], &[], "" ; "empty intake")]
    fn groups_join_without_padding(meds: &[&str], syms: &[&str], conds: &[&str], expected: &str) {
        assert_eq!(drug_usage(&strings(meds), &strings(syms), &strings(conds)), expected);
    }

    #[test]
    fn clinical_text_lists_every_field() {
        let intake: DetectionIntake = serde_json::from_value(json!({
            "patientId": "P-100",
            "hospitalId": "H-7",
            "fullName": "Jane Roe",
            "age": 54,
            "medications": { "Varenicline": "stopped", "Aspirin": "started" },
            "symptoms": ["nausea", "jaundice"],
            "conditions": "diabetes",
        }))
        .unwrap();

        assert_eq!(
            intake.clinical_text(),
            "Patient ID: P-100, Hospital ID: H-7, Name: Jane Roe, Age: 54, \
             Medications: Aspirin: started, Varenicline: stopped, \
             Symptoms: nausea, jaundice, Conditions: diabetes"
        );
    }

    #[test]
    fn clinical_text_tolerates_missing_fields() {
        let intake = DetectionIntake::default();
        assert_eq!(
            intake.clinical_text(),
            "Patient ID: , Hospital ID: , Name: , Age: , Medications: , Symptoms: , Conditions: "
        );
    }
}
