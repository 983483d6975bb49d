//! Content of the credentials request document.
//!
//! Everything rendered into the PDF lives in these plain data types.  The literal content of the
//! request is produced by [`CredentialsRequest::default`]; the layout code consumes it once, in
//! order, and never mutates it.

use genpdf::style::Color;

use crate::palette;

/// Returns whether a value reads like an identifier or key name rather than prose.
///
/// Such values are highlighted in credential cards.
pub fn looks_technical(value: &str) -> bool {
    value.contains("API") || value.contains('_')
}

/// The company the request is sent on behalf of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Brand {
    /// Full name shown in the page header.
    pub name: String,
    /// Short initials printed inside the logo square.
    pub initials: String,
}

/// A single label/value line inside a credential card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRow {
    pub label: String,
    pub value: String,
}

impl CardRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A numbered card describing one required credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialCard {
    pub number: u32,
    pub name: String,
    /// Short category shown in the pill on the right.
    pub tag: String,
    pub rows: Vec<CardRow>,
}

impl CredentialCard {
    pub fn new(
        number: u32,
        name: impl Into<String>,
        tag: impl Into<String>,
        rows: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            tag: tag.into(),
            rows: rows
                .into_iter()
                .map(|(label, value)| CardRow::new(label, value))
                .collect(),
        }
    }
}

/// One row of a service table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRow {
    pub service: String,
    pub credentials: String,
    pub purpose: String,
}

impl ServiceRow {
    pub fn new(
        service: impl Into<String>,
        credentials: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            credentials: credentials.into(),
            purpose: purpose.into(),
        }
    }
}

/// A titled table of services with a colored bullet.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceTable {
    pub title: String,
    pub accent: Color,
    pub rows: Vec<ServiceRow>,
}

/// The section with the primary, launch-blocking credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriticalSection {
    pub title: String,
    pub lead: String,
    pub cards: Vec<CredentialCard>,
}

/// Guidance on how credentials should be transmitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityNotice {
    pub title: String,
    pub intro: String,
    pub channels: Vec<String>,
}

/// A rollout phase in the recommended priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phase {
    /// Badge text, e.g. `Phase 1`.
    pub label: String,
    pub name: String,
    pub items: Vec<String>,
}

impl Phase {
    pub fn new(
        label: impl Into<String>,
        name: impl Into<String>,
        items: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            items: items.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Phased setup plan closing the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityPlan {
    pub title: String,
    pub lead: String,
    pub phases: Vec<Phase>,
}

/// The complete content of the request document.
#[derive(Clone, Debug, PartialEq)]
pub struct CredentialsRequest {
    brand: Brand,
    date: String,
    title: String,
    subtitle: String,
    overview: String,
    critical: CriticalSection,
    analytics: ServiceTable,
    communications: ServiceTable,
    security: SecurityNotice,
    priority: PriorityPlan,
    contact_line: String,
}

impl CredentialsRequest {
    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    /// Date printed in the page header.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn critical(&self) -> &CriticalSection {
        &self.critical
    }

    pub fn analytics(&self) -> &ServiceTable {
        &self.analytics
    }

    pub fn communications(&self) -> &ServiceTable {
        &self.communications
    }

    pub fn security(&self) -> &SecurityNotice {
        &self.security
    }

    pub fn priority(&self) -> &PriorityPlan {
        &self.priority
    }

    /// Line printed at the bottom left of every page.
    pub fn contact_line(&self) -> &str {
        &self.contact_line
    }

    /// Replaces the header date and returns the updated request.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = brand;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Replaces the paragraph shown in the overview box.
    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_critical(mut self, critical: CriticalSection) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_analytics(mut self, analytics: ServiceTable) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_communications(mut self, communications: ServiceTable) -> Self {
        self.communications = communications;
        self
    }

    pub fn with_security(mut self, security: SecurityNotice) -> Self {
        self.security = security;
        self
    }

    pub fn with_priority(mut self, priority: PriorityPlan) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_contact_line(mut self, contact_line: impl Into<String>) -> Self {
        self.contact_line = contact_line.into();
        self
    }
}

impl Default for CredentialsRequest {
    fn default() -> Self {
        Self {
            brand: Brand {
                name: "Results Roofing".to_owned(),
                initials: "RR".to_owned(),
            },
            date: "January 26, 2026".to_owned(),
            title: "Credentials & Access Request".to_owned(),
            subtitle: "MVP B Development - Website Overhaul Project".to_owned(),
            overview: "The Results Roofing self-service quote platform is progressing well. \
                       We have completed the core infrastructure, quote flow, payment \
                       integration, and customer portal. However, several features are \
                       blocked pending access to third-party services."
                .to_owned(),
            critical: CriticalSection {
                title: "Critical - Required for MVP Launch".to_owned(),
                lead: "These credentials are blocking core features that customers will use."
                    .to_owned(),
                cards: default_cards(),
            },
            analytics: ServiceTable {
                title: "Analytics & Tracking".to_owned(),
                accent: palette::AMBER,
                rows: vec![
                    ServiceRow::new(
                        "Google Analytics 4",
                        "GA4_MEASUREMENT_ID, GA4_API_SECRET",
                        "Production analytics",
                    ),
                    ServiceRow::new("Google Tag Manager", "GTM_CONTAINER_ID", "Tag management"),
                    ServiceRow::new(
                        "Meta/Facebook",
                        "META_PIXEL_ID, META_CAPI_TOKEN",
                        "Ad conversion tracking",
                    ),
                ],
            },
            communications: ServiceTable {
                title: "Communications".to_owned(),
                accent: palette::GREEN,
                rows: vec![
                    ServiceRow::new(
                        "SignalWire",
                        "SIGNALWIRE_PROJECT_ID, API_TOKEN, SPACE_URL",
                        "SMS notifications",
                    ),
                    ServiceRow::new("Resend", "RESEND_API_KEY", "Email delivery"),
                ],
            },
            security: SecurityNotice {
                title: "How to Send Credentials Securely".to_owned(),
                intro: "Do NOT send credentials via regular email. Please use:".to_owned(),
                channels: vec![
                    "- 1Password / LastPass - Share via secure vault".to_owned(),
                    "- Encrypted email - Use ProtonMail or similar".to_owned(),
                    "- Secure document - Password-protected PDF".to_owned(),
                ],
            },
            priority: PriorityPlan {
                title: "Recommended Priority Order".to_owned(),
                lead: "If you need to set these up in phases:".to_owned(),
                phases: vec![
                    Phase::new(
                        "Phase 1",
                        "Core Quote Flow",
                        ["1. Roofr", "2. Clerk", "3. Google Places"],
                    ),
                    Phase::new(
                        "Phase 2",
                        "Transactions",
                        ["4. Documenso", "5. Cal.com", "6. Wisetack"],
                    ),
                    Phase::new(
                        "Phase 3",
                        "Operations",
                        ["7. JobNimbus", "8. SignalWire", "9. GA4 + GTM"],
                    ),
                ],
            },
            contact_line: "Questions? Contact us to schedule a call.".to_owned(),
        }
    }
}

fn default_cards() -> Vec<CredentialCard> {
    vec![
        CredentialCard::new(
            1,
            "Roofr",
            "Satellite Measurements",
            [
                ("What we need", "API Key"),
                ("Environment variable", "ROOFR_API_KEY"),
                ("Why it is needed", "Enables live satellite roof measurements"),
                ("Sign up", "https://roofr.com"),
            ],
        ),
        CredentialCard::new(
            2,
            "JobNimbus",
            "CRM Integration",
            [
                ("What we need", "API Key"),
                ("Environment variable", "JOBNIMBUS_API_KEY"),
                ("Why it is needed", "Syncs leads and jobs to your CRM"),
                ("Sign up", "Contact your JobNimbus rep"),
            ],
        ),
        CredentialCard::new(
            3,
            "Documenso",
            "E-Signatures",
            [
                ("What we need", "API Key"),
                ("Environment variable", "DOCUMENSO_API_KEY"),
                ("Why it is needed", "Allows customers to e-sign contracts"),
                ("Sign up", "https://documenso.com"),
            ],
        ),
        CredentialCard::new(
            4,
            "Cal.com",
            "Scheduling",
            [
                ("What we need", "API Key + Event Type ID"),
                ("Environment variables", "CALCOM_API_KEY, CALCOM_EVENT_TYPE_ID"),
                ("Why it is needed", "Lets customers book appointments"),
                ("Sign up", "https://cal.com"),
            ],
        ),
        CredentialCard::new(
            5,
            "Wisetack",
            "Financing",
            [
                ("What we need", "Merchant ID + API Key"),
                ("Environment variables", "WISETACK_MERCHANT_ID, WISETACK_API_KEY"),
                ("Why it is needed", "Enables customer financing"),
                ("Sign up", "https://wisetack.com (merchant partnership)"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_values_are_detected() {
        assert!(looks_technical("API Key"));
        assert!(looks_technical("ROOFR_API_KEY"));
        assert!(looks_technical("GTM_CONTAINER_ID"));
        assert!(!looks_technical("https://roofr.com"));
        assert!(!looks_technical("Syncs leads and jobs to your CRM"));
    }

    #[test]
    fn default_content_lists_every_credential() {
        let request = CredentialsRequest::default();
        let names: Vec<_> = request
            .critical()
            .cards
            .iter()
            .map(|card| card.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Roofr", "JobNimbus", "Documenso", "Cal.com", "Wisetack"]
        );
        assert!(request.critical().cards.iter().all(|card| card.rows.len() == 4));
        assert_eq!(request.analytics().rows.len(), 3);
        assert_eq!(request.communications().rows.len(), 2);
        assert_eq!(request.security().channels.len(), 3);
    }

    #[test]
    fn card_numbers_are_sequential() {
        let request = CredentialsRequest::default();
        for (index, card) in request.critical().cards.iter().enumerate() {
            assert_eq!(card.number as usize, index + 1);
        }
    }

    #[test]
    fn phases_hold_three_items_each() {
        let request = CredentialsRequest::default();
        let phases = &request.priority().phases;
        assert_eq!(phases.len(), 3);
        assert!(phases.iter().all(|phase| phase.items.len() == 3));
        assert_eq!(phases[2].items[2], "9. GA4 + GTM");
    }

    #[test]
    fn setters_replace_only_their_part() {
        let brand = Brand {
            name: "Acme Roofing".to_owned(),
            initials: "AR".to_owned(),
        };
        let request = CredentialsRequest::default()
            .with_brand(brand.clone())
            .with_title("Access Request")
            .with_overview("Short overview.")
            .with_contact_line("Call us.");

        assert_eq!(request.brand(), &brand);
        assert_eq!(request.title(), "Access Request");
        assert_eq!(request.overview(), "Short overview.");
        assert_eq!(request.contact_line(), "Call us.");
        assert_eq!(request.critical(), CredentialsRequest::default().critical());
        assert_eq!(request.date(), "January 26, 2026");
    }

    #[test]
    fn with_date_replaces_header_date() {
        let request = CredentialsRequest::default().with_date("March 3, 2026");
        assert_eq!(request.date(), "March 3, 2026");
    }
}
