//! Plain-text rendering for the CLI.
//!
//! Reports print as grouped sections with aligned `label: value` rows,
//! crop lists and history as fixed-width tables.

use cropwise::knowledge::{KnowledgeBase, SoilClass};
use cropwise::logic::explanation::format_inr;
use cropwise::models::{
    Feedback, FeatureVector, HistoryEntry, RecommendationRecord, RecommendationReport,
    SoilHealthReport, WeatherSnapshot,
};

const LABEL_WIDTH: usize = 26;

// ── Public API ──

pub fn print_report(report: &RecommendationReport, weather: Option<&WeatherSnapshot>) {
    println!(
        "=== Crop recommendations ({}) ===",
        month_name(report.month)
    );
    println!();

    if let Some(weather) = weather {
        print_row("Weather", &weather.summary());
        println!();
    }

    print_features(&report.features);
    println!();

    if report.used_fallback {
        println!("No crop cleared the suitability threshold; showing a conservative default.");
        println!();
    }

    print_records(&report.recommendations);
    println!();

    println!("── Why ──");
    println!("{}", report.explanation.narrative);
    if !report.explanation.top_features.is_empty() {
        println!();
        for impact in &report.explanation.top_features {
            println!(
                "  {:<20} {:>5.1}%  {}",
                impact.feature,
                impact.impact * 100.0,
                bar(impact.impact)
            );
        }
    }
    println!();

    print_soil_health(&report.soil_health);
    println!();
    println!(
        "Scoring: {}, risk: {}",
        report.scoring_policy, report.risk_policy
    );
}

pub fn print_crops(knowledge: &KnowledgeBase) {
    println!(
        "{:<14} {:>10} {:>9} {:>10} {:<10} {:<16} {:>8}",
        "Crop", "Temp °C", "pH", "Rain mm", "Water", "Seasons", "₹/qtl"
    );
    println!("{}", "─".repeat(84));
    for crop in knowledge.iter() {
        let seasons: Vec<&str> = crop.growing_seasons.iter().map(|s| s.as_str()).collect();
        println!(
            "{:<14} {:>4.0}-{:<5.0} {:>4.1}-{:<4.1} {:>10.0} {:<10} {:<16} {:>8}",
            crop.name,
            crop.temperature_range.min,
            crop.temperature_range.max,
            crop.ph_range.min,
            crop.ph_range.max,
            crop.rainfall_minimum,
            crop.water_requirement.as_str(),
            seasons.join(", "),
            format_inr(crop.reference_price_per_quintal)
        );
    }
    println!();
    println!("{} crops", knowledge.len());
    println!();

    println!("── Soil classes ──");
    for class in SoilClass::ALL {
        println!("  {:<10} {}", class.as_str(), class.description());
    }
}

pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No saved recommendations yet.");
        return;
    }

    println!(
        "{:>5}  {:<17}  {:<10}  {:<14}  {:>6}  {:<18}",
        "ID", "When", "Month", "Top crop", "Score", "Policy"
    );
    println!("{}", "─".repeat(80));
    for entry in entries {
        let score = entry
            .recommendations
            .first()
            .map(|r| format!("{:.2}", r.suitability_score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<17}  {:<10}  {:<14}  {:>6}  {:<18}",
            entry.id.map(|id| id.to_string()).unwrap_or_default(),
            entry
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            month_name(entry.month),
            entry.top_crop,
            score,
            entry.scoring_policy
        );
    }
}

pub fn print_history_entry(entry: &HistoryEntry, feedback: &[Feedback]) {
    println!(
        "=== Run #{} ({}) ===",
        entry.id.map(|id| id.to_string()).unwrap_or_default(),
        entry
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!();
    print_row("Month", month_name(entry.month));
    print_row("Scoring", &entry.scoring_policy);
    println!();
    print_features(&entry.features);
    println!();
    print_records(&entry.recommendations);
    println!();
    println!("{}", entry.narrative);

    if !feedback.is_empty() {
        println!();
        println!("── Feedback ──");
        for f in feedback {
            let verdict = if f.helpful { "✓ helpful" } else { "✗ not helpful" };
            match &f.notes {
                Some(notes) => println!("  {:<15} {}", verdict, notes),
                None => println!("  {}", verdict),
            }
        }
    }
}

// ── Sections ──

fn print_features(features: &FeatureVector) {
    println!("── Field conditions ──");
    print_row("Temperature", &format!("{:.1} °C", features.temperature));
    print_row("Humidity", &format!("{:.0} %", features.humidity));
    print_row("Rainfall", &format!("{:.1} mm", features.rainfall));
    print_row("pH", &format!("{:.1}", features.ph));
    print_row(
        "N / P / K (kg/ha)",
        &format!(
            "{:.0} / {:.0} / {:.0}",
            features.nitrogen, features.phosphorus, features.potassium
        ),
    );
    print_row("Organic carbon", &format!("{:.2} %", features.organic_carbon));
    print_row("Soil type", &features.soil_type);
    print_row("Area", &format!("{} ha", features.area_ha));
    print_row("Farming method", features.farming_method.as_str());
    print_row("Irrigation", features.irrigation_type.as_str());
    print_row("Experience", &format!("{} years", features.experience_years));
}

fn print_records(records: &[RecommendationRecord]) {
    println!(
        "{:<3} {:<14} {:>6} {:>9} {:>12} {:>6} {:>6} {:<8} {:<10} {:<11}",
        "#", "Crop", "Score", "kg/ha", "Profit ₹", "Sust.", "Conf.", "Risk", "Season", "Demand"
    );
    println!("{}", "─".repeat(96));
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:<3} {:<14} {:>6.2} {:>9.0} {:>12} {:>6.2} {:>6.2} {} {:<6} {:<10} {:<11}",
            i + 1,
            r.crop,
            r.suitability_score,
            r.predicted_yield_kg_per_ha,
            format_inr(r.estimated_profit_inr),
            r.sustainability_score,
            r.confidence,
            r.risk_level.symbol(),
            r.risk_level.as_str(),
            r.season_suitability.as_str(),
            r.market_demand.as_str()
        );
    }
}

fn print_soil_health(soil: &SoilHealthReport) {
    println!("── Soil health ──");
    print_row("Score", &format!("{}/100", soil.health_score));
    print_row("Nutrients", &soil.nutrient_summary());
    for advice in &soil.advice {
        println!("  • {}", advice);
    }
}

// ── Helpers ──

fn print_row(label: &str, value: &str) {
    println!("  {:<width$} {}", format!("{}:", label), value, width = LABEL_WIDTH);
}

fn bar(fraction: f64) -> String {
    "█".repeat((fraction.clamp(0.0, 1.0) * 20.0).round() as usize)
}

fn month_name(month: u32) -> &'static str {
    cropwise::logic::season::month_from_number(month)
        .map(|m| m.name())
        .unwrap_or("?")
}
