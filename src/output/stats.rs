//! Run statistics
//!
//! Counters gathered while processing targets, printed at the end of a run.

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Distinct targets after de-duplication
    pub targets: u64,

    /// Targets that were not absolute http(s) URLs
    pub skipped_non_matching: u64,

    /// Provider board URLs without a company slug
    pub skipped_missing_slug: u64,

    /// Career pages disallowed by robots.txt
    pub robots_denied: u64,

    /// Targets whose extraction failed after retries
    pub extraction_failures: u64,

    /// Targets that were read but listed nothing
    pub empty_targets: u64,

    /// Raw listings returned by strategies, before the per-site cap
    pub listings_extracted: u64,

    /// Raw listings dropped by the per-site cap
    pub listings_capped: u64,

    /// Records dropped by validation
    pub records_rejected: u64,

    /// Records kept for output
    pub records_accepted: u64,
}

impl RunStatistics {
    /// Targets that contributed no records for any reason
    pub fn targets_without_records(&self) -> u64 {
        self.skipped_non_matching
            + self.skipped_missing_slug
            + self.robots_denied
            + self.extraction_failures
            + self.empty_targets
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");
    println!("Targets:               {}", stats.targets);
    println!("  Non-matching URLs:   {}", stats.skipped_non_matching);
    println!("  Missing slug:        {}", stats.skipped_missing_slug);
    println!("  Robots denied:       {}", stats.robots_denied);
    println!("  Extraction failures: {}", stats.extraction_failures);
    println!("  Empty:               {}", stats.empty_targets);
    println!("  Without records:     {}", stats.targets_without_records());
    println!();
    println!("Listings extracted:    {}", stats.listings_extracted);
    println!("  Over per-site cap:   {}", stats.listings_capped);
    println!("Records rejected:      {}", stats.records_rejected);
    println!("Records accepted:      {}", stats.records_accepted);
}
