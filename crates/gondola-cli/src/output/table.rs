use gondola_core::aggregate::AggregateResult;
use gondola_core::model::{Audit, AuditDetail, AuditItem, AuditStats};
use gondola_core::report::ReportData;

pub fn print_audit_list(audits: &[(Audit, AuditStats)]) {
    if audits.is_empty() {
        println!("No audits.");
        return;
    }

    println!(
        "{:>5}  {:<10}  {:<12}  {:<30}  {:>7}  {:>7}  {:>9}  {:>5}",
        "ID", "Date", "Status", "Title", "Items", "Pending", "Divergent", "Conf%"
    );
    for (audit, stats) in audits {
        println!(
            "{:>5}  {:<10}  {:<12}  {:<30}  {:>7}  {:>7}  {:>9}  {:>5}",
            audit.id,
            audit.reference_date,
            audit.status.as_str(),
            truncate(&audit.title, 30),
            stats.total_items,
            stats.pending,
            stats.divergent,
            stats.conformity_pct,
        );
    }
}

pub fn print_detail(detail: &AuditDetail) {
    let audit = &detail.audit;
    println!("=== Audit {}: {} ===", audit.id, audit.title);
    println!("  date: {}  status: {}", audit.reference_date, audit.status);
    if let Some(ref store_id) = audit.store_id {
        println!("  store: {store_id}");
    }
    if let Some(ref notes) = audit.notes {
        println!("  notes: {notes}");
    }
    print_stats(&detail.stats);
    println!();
    print_items(&detail.items);
}

fn print_stats(stats: &AuditStats) {
    println!(
        "  {} item(s): {} pending, {} correct, {} divergent ({}% conformity)",
        stats.total_items, stats.pending, stats.correct, stats.divergent, stats.conformity_pct
    );
}

pub fn print_items(items: &[AuditItem]) {
    if items.is_empty() {
        println!("No items.");
        return;
    }

    println!(
        "{:>6}  {:<14}  {:<36}  {:>5}  {:>9}  {:>9}  {:<9}  {:<10}",
        "ID", "Barcode", "Description", "Sec", "Price", "Promo", "Status", "By"
    );
    for item in items {
        println!(
            "{:>6}  {:<14}  {:<36}  {:>5}  {:>9}  {:>9}  {:<9}  {:<10}",
            item.id,
            item.barcode.as_deref().unwrap_or("-"),
            truncate(&item.description, 36),
            item.section.as_deref().unwrap_or("-"),
            item.list_price,
            item.promo_price,
            item.status.as_str(),
            item.verified_by.as_deref().unwrap_or("-"),
        );
    }
}

pub fn print_aggregate(result: &AggregateResult) {
    let t = &result.totals;
    println!("=== Aggregation ===\n");
    println!(
        "  {} audit(s), {} item(s), {} verified: {} correct, {} divergent",
        t.audits, t.items, t.verified, t.correct, t.divergent
    );
    println!(
        "  conformity {:.1}%  divergence {:.1}%  divergent value R$ {}",
        t.conformity_rate * 100.0,
        t.divergence_rate * 100.0,
        t.divergent_value
    );

    if !result.products.is_empty() {
        println!("\n  Divergent products:");
        for p in &result.products {
            println!(
                "    {:>3}x  {:<36}  sec {:<5}  {:>9}",
                p.occurrences,
                truncate(&p.description, 36),
                p.section.as_deref().unwrap_or("-"),
                p.list_price,
            );
        }
    }

    if !result.sections_by_count.is_empty() {
        println!("\n  Sections by divergence count:");
        for s in &result.sections_by_count {
            println!("    {:<10}  {:>4} divergence(s)", s.section, s.divergences);
        }
        println!("\n  Sections by divergent value:");
        for s in &result.sections_by_value {
            println!("    {:<10}  R$ {:>10}", s.section, s.value);
        }
    }

    if result.weekdays.iter().any(|w| w.divergent > 0) {
        println!("\n  Divergences by weekday:");
        for w in &result.weekdays {
            println!("    {:<10}  {:>4}", w.weekday, w.divergent);
        }
    }

    println!("\n  POS discounts in period: R$ {}", result.discounts.total);
    for s in &result.discounts.by_section {
        println!("    {:<10}  R$ {:>10}", s.section, s.total);
    }
}

pub fn print_report(report: &ReportData) {
    println!(
        "=== Report: {} ({}) ===",
        report.audit.title, report.audit.reference_date
    );
    println!("  generated at {}", report.generated_at.to_rfc3339());
    print_stats(&report.stats);

    for (label, items) in [
        ("Divergent", &report.divergent),
        ("Pending", &report.pending),
        ("Correct", &report.correct),
    ] {
        if items.is_empty() {
            continue;
        }
        println!("\n--- {label} ---");
        print_items(items);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
