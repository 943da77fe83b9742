//! Layer Catalog: tujuh stage OSI dalam urutan tetap
//!
//! Layout (send direction, outer → inner):
//! ┌───┬──────────────┬─────┐
//! │ 0 │ Application  │ APP │
//! │ 1 │ Presentation │ PRS │
//! │ 2 │ Session      │ SES │
//! │ 3 │ Transport    │ TCP │
//! │ 4 │ Network      │ IP  │
//! │ 5 │ DataLink     │ MAC │
//! │ 6 │ Physical     │ PHY │
//! └───┴──────────────┴─────┘
//!
//! Receive direction traverses the same table 6 → 0.

/// Satu entry di catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub name: &'static str,
    pub position: usize,
    pub tag: &'static str,
}

impl Layer {
    const fn new(name: &'static str, position: usize, tag: &'static str) -> Self {
        Self {
            name,
            position,
            tag,
        }
    }

    /// `TAG{data}`
    pub fn wrap(&self, data: &str) -> String {
        format!("{}{{{}}}", self.tag, data)
    }

    /// Inverse of [`Layer::wrap`]. `None` if `data` is not wrapped by this layer.
    pub fn strip<'a>(&self, data: &'a str) -> Option<&'a str> {
        data.strip_prefix(self.tag)?
            .strip_prefix('{')?
            .strip_suffix('}')
    }
}

pub const LAYER_COUNT: usize = 7;

pub static LAYERS: [Layer; LAYER_COUNT] = [
    Layer::new("Application", 0, "APP"),
    Layer::new("Presentation", 1, "PRS"),
    Layer::new("Session", 2, "SES"),
    Layer::new("Transport", 3, "TCP"),
    Layer::new("Network", 4, "IP"),
    Layer::new("DataLink", 5, "MAC"),
    Layer::new("Physical", 6, "PHY"),
];

/// Layer names in catalog order, as declared in every packet.
pub fn layer_names() -> Vec<String> {
    LAYERS.iter().map(|l| l.name.to_string()).collect()
}

/// Send-direction groups: (0,1), (2,3), (4,5), (6).
pub fn tx_groups() -> Vec<&'static [Layer]> {
    LAYERS.chunks(2).collect()
}

/// Receive-direction groups: (5,6), (3,4), (1,2), (0).
///
/// Walks 6 → 0 pairing the current index with the one before it, so each
/// group lists the lower index first and the last group is a singleton.
pub fn rx_groups() -> Vec<&'static [Layer]> {
    LAYERS.rchunks(2).collect()
}

/// Wrap `payload` through every layer in send order; Physical ends up outermost.
pub fn envelope(payload: &str) -> String {
    LAYERS
        .iter()
        .fold(payload.to_string(), |data, layer| layer.wrap(&data))
}

/// Receive-order view of an [`envelope`]: each layer paired with what is left
/// after its tag is removed. Stops at the first layer whose tag is missing.
pub fn peel(data: &str) -> Vec<(&'static Layer, &str)> {
    let mut views = Vec::with_capacity(LAYER_COUNT);
    let mut rest = data;
    for layer in LAYERS.iter().rev() {
        match layer.strip(rest) {
            Some(inner) => {
                views.push((layer, inner));
                rest = inner;
            }
            None => break,
        }
    }
    views
}

/// Strip a complete [`envelope`]. `None` if any layer is missing.
pub fn strip_envelope(data: &str) -> Option<&str> {
    let views = peel(data);
    if views.len() == LAYER_COUNT {
        views.last().map(|(_, inner)| *inner)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(groups: &[&[Layer]]) -> Vec<Vec<&'static str>> {
        groups
            .iter()
            .map(|g| g.iter().map(|l| l.name).collect())
            .collect()
    }

    #[test]
    fn test_catalog_positions() {
        for (i, layer) in LAYERS.iter().enumerate() {
            assert_eq!(layer.position, i);
        }
        assert_eq!(LAYERS[0].name, "Application");
        assert_eq!(LAYERS[6].name, "Physical");
    }

    #[test]
    fn test_tx_groups() {
        assert_eq!(
            names(&tx_groups()),
            vec![
                vec!["Application", "Presentation"],
                vec!["Session", "Transport"],
                vec!["Network", "DataLink"],
                vec!["Physical"],
            ]
        );
    }

    #[test]
    fn test_rx_groups_keep_lower_index_first() {
        assert_eq!(
            names(&rx_groups()),
            vec![
                vec!["DataLink", "Physical"],
                vec!["Transport", "Network"],
                vec!["Presentation", "Session"],
                vec!["Application"],
            ]
        );
    }

    #[test]
    fn test_envelope() {
        let wrapped = envelope("Hello");
        assert_eq!(wrapped, "PHY{MAC{IP{TCP{SES{PRS{APP{Hello}}}}}}}");
        assert_eq!(strip_envelope(&wrapped), Some("Hello"));
    }

    #[test]
    fn test_envelope_keeps_braces_in_payload() {
        let wrapped = envelope("{\"a\":1}");
        assert_eq!(strip_envelope(&wrapped), Some("{\"a\":1}"));
    }

    #[test]
    fn test_peel_reports_each_layer() {
        let wrapped = envelope("x");
        let views = peel(&wrapped);
        assert_eq!(views.len(), LAYER_COUNT);
        assert_eq!(views[0].0.name, "Physical");
        assert_eq!(views[0].1, "MAC{IP{TCP{SES{PRS{APP{x}}}}}}");
        assert_eq!(views[6].0.name, "Application");
        assert_eq!(views[6].1, "x");
    }

    #[test]
    fn test_strip_envelope_rejects_missing_layer() {
        assert_eq!(peel("PHY{MAC{Hello}}").len(), 2);
        assert_eq!(strip_envelope("PHY{MAC{Hello}}"), None);
        assert_eq!(strip_envelope(""), None);
    }
}
