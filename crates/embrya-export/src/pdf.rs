//! PDF report rendering.
//!
//! Single-column A4 layout: header band, report metadata, viability
//! assessment, morphology, Gardner grading, genetic risk, clinical
//! recommendation, override section when one exists, disclaimer. Values
//! are quoted from the derived record verbatim.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use tracing::info;

use embrya_core::models::embryo::EmbryoResult;
use embrya_core::models::patient::Patient;

use crate::error::ExportError;
use crate::render::{clinical_status, ReportOptions};

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 15.0;
const LINE_HEIGHT_MM: f64 = 6.0;

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f64,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - 20.0,
        })
    }

    fn advance(&mut self, height: f64) {
        self.y -= height;
        if self.y < MARGIN_MM + LINE_HEIGHT_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - 20.0;
        }
    }

    fn heading(&mut self, text: &str) {
        self.advance(LINE_HEIGHT_MM * 1.5);
        self.layer
            .use_text(text, 13.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.advance(LINE_HEIGHT_MM);
    }

    fn field(&mut self, label: &str, value: &str) {
        self.layer
            .use_text(label, 10.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.layer
            .use_text(value, 10.0, Mm(MARGIN_MM + 55.0), Mm(self.y), &self.regular);
        self.advance(LINE_HEIGHT_MM);
    }

    fn line(&mut self, text: &str) {
        self.layer
            .use_text(text, 10.0, Mm(MARGIN_MM), Mm(self.y), &self.regular);
        self.advance(LINE_HEIGHT_MM);
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut bytes: Vec<u8> = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.doc
                .save(&mut writer)
                .map_err(|e| ExportError::Pdf(e.to_string()))?;
        }
        Ok(bytes)
    }
}

/// Render the PDF report for one embryo.
pub fn generate_pdf_report(
    embryo: &EmbryoResult,
    patient: Option<&Patient>,
    options: &ReportOptions,
    generated_at: jiff::Timestamp,
) -> Result<Vec<u8>, ExportError> {
    let mut pdf = PdfWriter::new("Embryo Viability Analysis Report")?;

    pdf.layer.use_text(
        "EMBRYO VIABILITY ANALYSIS REPORT",
        16.0,
        Mm(MARGIN_MM),
        Mm(pdf.y),
        &pdf.bold,
    );
    pdf.advance(LINE_HEIGHT_MM);
    pdf.line("Clinical Assessment | AI-Assisted Analysis");

    pdf.heading("REPORT INFORMATION");
    pdf.field("Generated:", &generated_at.to_string());
    pdf.field(
        "Clinic:",
        options.clinic_name.as_deref().unwrap_or("Not Specified"),
    );
    pdf.field(
        "Embryologist:",
        options
            .embryologist_name
            .as_deref()
            .unwrap_or("Not Specified"),
    );
    if let Some(patient) = patient {
        pdf.field("Patient Name:", &patient.name);
        pdf.field("Patient ID:", &patient.audit_code_or_id());
        pdf.field("Cycle Number:", &patient.cycle_number.to_string());
    } else {
        pdf.field("Patient ID:", "Anonymous");
    }
    pdf.field("Embryo ID:", &embryo.id.to_string());
    pdf.field("Embryo Name:", &embryo.name);

    let display_score = embryo.effective_score();
    pdf.heading("VIABILITY ASSESSMENT");
    pdf.field("Viability Score:", &format!("{display_score}/100"));
    pdf.field("Clinical Status:", clinical_status(display_score));
    pdf.field("Recommendation:", &embryo.recommendation);

    if let Some(analysis) = &embryo.comprehensive_analysis {
        let morphology = &analysis.morphological_analysis;
        pdf.heading("MORPHOLOGICAL CHARACTERISTICS");
        pdf.field(
            "Developmental Stage:",
            &analysis.morphokinetics.estimated_developmental_stage,
        );
        pdf.field(
            "Fragmentation:",
            &format!(
                "{}% ({})",
                morphology.fragmentation_percentage, morphology.fragmentation_level
            ),
        );
        pdf.field(
            "Circularity:",
            &format!(
                "{} ({})",
                morphology.circularity_score, morphology.circularity_grade
            ),
        );
        pdf.field("Cell Symmetry:", &morphology.cell_symmetry.to_string());
        pdf.field(
            "Zona Pellucida:",
            &format!(
                "{} um, {}",
                morphology.zona_pellucida_thickness, morphology.zona_pellucida_integrity
            ),
        );

        let grading = &analysis.blastocyst_grading;
        pdf.heading("GARDNER GRADING");
        pdf.field("Overall Grade:", &grading.overall_grade);
        pdf.field("Expansion Stage:", &grading.expansion_stage.to_string());
        pdf.field(
            "Inner Cell Mass (ICM):",
            &grading.inner_cell_mass_grade.to_string(),
        );
        pdf.field(
            "Trophectoderm (TE):",
            &grading.trophectoderm_grade.to_string(),
        );
        pdf.field("Assessment:", &grading.quality_assessment);

        let risk = &analysis.genetic_risk;
        pdf.heading("GENETIC RISK");
        pdf.field(
            "Chromosomal Risk:",
            &risk.chromosomal_risk_level.to_string(),
        );
        pdf.field(
            "Aneuploidy Score:",
            &format!("{}/100", risk.aneuploidy_risk_score),
        );
        pdf.field("PGT-A:", &risk.pgt_a_recommendation);

        let recommendation = &analysis.clinical_recommendation;
        pdf.heading("CLINICAL RECOMMENDATION");
        pdf.field(
            &format!("Priority {}:", recommendation.transfer_priority),
            &recommendation.transfer_recommendation,
        );
        for line in &recommendation.reasoning {
            pdf.line(&format!("- {line}"));
        }
    }

    if embryo.has_override() {
        pdf.heading("EMBRYOLOGIST OVERRIDE");
        if let Some(score) = embryo.override_score {
            pdf.field("Override Score:", &format!("{score}/100"));
            pdf.field(
                "Original Score:",
                &format!("{}/100", embryo.viability_score),
            );
        }
        if let Some(reason) = embryo.override_reason {
            pdf.field("Reason:", reason.label());
        }
        if let Some(grade) = embryo.manual_grade {
            pdf.field("Manual Grade:", &grade.to_string());
        }
        if let Some(notes) = &embryo.notes {
            pdf.field("Notes:", notes);
        }
    }

    pdf.heading("KEY FINDINGS");
    for finding in &embryo.key_findings {
        pdf.line(&format!("- {finding}"));
    }

    pdf.advance(LINE_HEIGHT_MM);
    pdf.line("This report was generated with AI assistance and is intended to");
    pdf.line("support, not replace, the judgment of a qualified embryologist.");
    pdf.line("All overrides are recorded in the audit trail.");

    info!(embryo = %embryo.name, "rendered PDF report");
    pdf.finish()
}
