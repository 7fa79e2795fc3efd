use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub route_optimizations_total: IntCounterVec,
    pub route_optimization_latency_seconds: HistogramVec,
    pub status_updates_total: IntCounterVec,
    pub active_deliveries: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let route_optimizations_total = IntCounterVec::new(
            Opts::new(
                "route_optimizations_total",
                "Total delivery rankings by request source",
            ),
            &["source"],
        )
        .expect("valid route_optimizations_total metric");

        let route_optimization_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "route_optimization_latency_seconds",
                "Latency of delivery ranking in seconds",
            )
            .buckets(vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
            &["source"],
        )
        .expect("valid route_optimization_latency_seconds metric");

        let status_updates_total = IntCounterVec::new(
            Opts::new("status_updates_total", "Delivery status updates by outcome"),
            &["outcome"],
        )
        .expect("valid status_updates_total metric");

        let active_deliveries =
            IntGauge::new("active_deliveries", "Deliveries not yet delivered or cancelled")
                .expect("valid active_deliveries metric");

        registry
            .register(Box::new(route_optimizations_total.clone()))
            .expect("register route_optimizations_total");
        registry
            .register(Box::new(route_optimization_latency_seconds.clone()))
            .expect("register route_optimization_latency_seconds");
        registry
            .register(Box::new(status_updates_total.clone()))
            .expect("register status_updates_total");
        registry
            .register(Box::new(active_deliveries.clone()))
            .expect("register active_deliveries");

        Self {
            registry,
            route_optimizations_total,
            route_optimization_latency_seconds,
            status_updates_total,
            active_deliveries,
        }
    }

    pub fn observe_optimization(&self, source: &str, elapsed_seconds: f64) {
        self.route_optimizations_total
            .with_label_values(&[source])
            .inc();
        self.route_optimization_latency_seconds
            .with_label_values(&[source])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
