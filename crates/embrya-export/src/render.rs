use serde::Serialize;
use tera::{Context, Tera};

use embrya_core::models::embryo::EmbryoResult;
use embrya_core::models::patient::Patient;

use crate::error::ExportError;

/// Report header details the clinic fills in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportOptions {
    pub clinic_name: Option<String>,
    pub embryologist_name: Option<String>,
}

/// Clinical status line banded on the displayed score, as the report
/// footer of the dashboard shows it.
pub fn clinical_status(score: f64) -> &'static str {
    if score >= 75.0 {
        "VIABLE - GOOD"
    } else if score >= 50.0 {
        "CAUTION - FAIR"
    } else {
        "RISK - POOR"
    }
}

const TEXT_REPORT_TEMPLATE: &str = "\
============================================================
            EMBRYO VIABILITY ANALYSIS REPORT
         Clinical Assessment | AI-Assisted Analysis
============================================================
Generated:     {{ generated_at }}
Clinic:        {{ clinic_name }}
Embryologist:  {{ embryologist }}
Patient:       {{ patient_name }} (Cycle {{ cycle_number }})
Patient ID:    {{ patient_code }}
Embryo:        {{ embryo.name }}
Embryo ID:     {{ embryo.id }}

VIABILITY ASSESSMENT
--------------------
Viability Score:  {{ score }}/100
Clinical Status:  {{ status }}
Recommendation:   {{ embryo.recommendation }}
{% if analysis %}
MORPHOLOGICAL CHARACTERISTICS
-----------------------------
Developmental Stage:   {{ analysis.morphokinetics.estimated_developmental_stage }}
Fragmentation:         {{ analysis.morphological_analysis.fragmentation_percentage }}% ({{ analysis.morphological_analysis.fragmentation_level }})
Circularity:           {{ analysis.morphological_analysis.circularity_score }} ({{ analysis.morphological_analysis.circularity_grade }})
Cell Symmetry:         {{ analysis.morphological_analysis.cell_symmetry }}
Zona Pellucida:        {{ analysis.morphological_analysis.zona_pellucida_thickness }} um, {{ analysis.morphological_analysis.zona_pellucida_integrity }}

GARDNER GRADING
---------------
Overall Grade:     {{ analysis.blastocyst_grading.overall_grade }}
Expansion Stage:   {{ analysis.blastocyst_grading.expansion_stage }}
Inner Cell Mass:   {{ analysis.blastocyst_grading.inner_cell_mass_grade }}
Trophectoderm:     {{ analysis.blastocyst_grading.trophectoderm_grade }}
Assessment:        {{ analysis.blastocyst_grading.quality_assessment }}

GENETIC RISK
------------
Chromosomal Risk:  {{ analysis.genetic_risk.chromosomal_risk_level }}
Aneuploidy Score:  {{ analysis.genetic_risk.aneuploidy_risk_score }}/100
PGT-A:             {{ analysis.genetic_risk.pgt_a_recommendation }}

CLINICAL RECOMMENDATION
-----------------------
{{ analysis.clinical_recommendation.transfer_recommendation }} (priority {{ analysis.clinical_recommendation.transfer_priority }})
{% for line in analysis.clinical_recommendation.reasoning %}  - {{ line }}
{% endfor %}{% endif %}{% if has_override %}
EMBRYOLOGIST OVERRIDE
---------------------
Override Score:  {{ override_score }}
Reason:          {{ override_reason }}
Manual Grade:    {{ manual_grade }}
Notes:           {{ override_notes }}
{% endif %}
KEY FINDINGS
------------
{% for finding in embryo.keyFindings %}  - {{ finding }}
{% endfor %}
------------------------------------------------------------
This report was generated with AI assistance and is intended
to support, not replace, the judgment of a qualified
embryologist. All overrides are recorded in the audit trail.
============================================================
";

/// Render the plain-text report for one embryo.
///
/// Numeric fields come straight from the embedded prediction record; the
/// template only formats, never recomputes.
pub fn render_text_report(
    embryo: &EmbryoResult,
    patient: Option<&Patient>,
    options: &ReportOptions,
    generated_at: jiff::Timestamp,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template("embryo_report", TEXT_REPORT_TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_value(report_context(embryo, patient, options, generated_at)?)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render("embryo_report", &context)?;
    Ok(rendered)
}

fn report_context(
    embryo: &EmbryoResult,
    patient: Option<&Patient>,
    options: &ReportOptions,
    generated_at: jiff::Timestamp,
) -> Result<serde_json::Value, ExportError> {
    let display_score = embryo.effective_score();
    Ok(serde_json::json!({
        "generated_at": generated_at.to_string(),
        "clinic_name": options.clinic_name.as_deref().unwrap_or("Not Specified"),
        "embryologist": options.embryologist_name.as_deref().unwrap_or("Not Specified"),
        "patient_name": patient.map(|p| p.name.as_str()).unwrap_or("Anonymous"),
        "patient_code": patient.map(Patient::audit_code_or_id).unwrap_or_else(|| "Anonymous".to_string()),
        "cycle_number": patient.map(|p| p.cycle_number).unwrap_or(1),
        "embryo": serde_json::to_value(embryo)?,
        "analysis": serde_json::to_value(&embryo.comprehensive_analysis)?,
        "score": display_score,
        "status": clinical_status(display_score),
        "has_override": embryo.has_override(),
        "override_score": embryo.override_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
        "override_reason": embryo.override_reason.map(|r| r.label().to_string()).unwrap_or_else(|| "-".to_string()),
        "manual_grade": embryo.manual_grade.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string()),
        "override_notes": embryo.notes.as_deref().unwrap_or("-"),
    }))
}
