use serde::Serialize;
use std::str::FromStr;

/// Language of every operator-facing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "ro")]
    Romanian,
    #[serde(rename = "en")]
    English,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ro" | "ro-ro" | "romanian" => Ok(Locale::Romanian),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::English),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl Locale {
    /// Leading word of every error-flavored message.
    pub fn error_prefix(self) -> &'static str {
        match self {
            Locale::Romanian => "Eroare",
            Locale::English => "Error",
        }
    }

    pub fn is_error_text(self, text: &str) -> bool {
        text.starts_with(self.error_prefix())
    }

    pub fn select_file_first(self) -> String {
        match self {
            Locale::Romanian => "Eroare: Te rog selectează un fișier CSV.".to_string(),
            Locale::English => "Error: Please select a CSV file first.".to_string(),
        }
    }

    pub fn invalid_drop(self) -> String {
        match self {
            Locale::Romanian => "Eroare: Te rog să tragi un fișier CSV valid.".to_string(),
            Locale::English => "Error: Please drop a valid CSV file.".to_string(),
        }
    }

    pub fn uploading(self) -> String {
        match self {
            Locale::Romanian => "Încărcare în curs...".to_string(),
            Locale::English => "Uploading...".to_string(),
        }
    }

    pub fn upload_succeeded(self, message: &str, rows: Option<u64>, columns: Option<u64>) -> String {
        let rows = count_or_unknown(rows);
        let columns = count_or_unknown(columns);
        match self {
            Locale::Romanian => format!("Succes: {message} (Rânduri: {rows}, Coloane: {columns})"),
            Locale::English => format!("Success: {message} (Rows: {rows}, Columns: {columns})"),
        }
    }

    pub fn upload_failed(self, server_error: Option<&str>) -> String {
        let detail = server_error
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.unknown_error());
        format!("{}: {detail}", self.error_prefix())
    }

    pub fn upload_unreachable(self) -> String {
        match self {
            Locale::Romanian => {
                "Eroare la conectarea cu serverul. Asigură-te că serverul rulează.".to_string()
            }
            Locale::English => {
                "Error connecting to the server. Make sure the server is running.".to_string()
            }
        }
    }

    pub fn stats_failed(self) -> String {
        match self {
            Locale::Romanian => "A apărut o eroare la preluarea statisticilor.".to_string(),
            Locale::English => "An error occurred while fetching the statistics.".to_string(),
        }
    }

    pub fn stats_unreachable(self) -> String {
        match self {
            Locale::Romanian => "Nu s-a putut conecta la server. Asigură-te că serverul Flask rulează și că ai încărcat un fișier CSV.".to_string(),
            Locale::English => "Could not connect to the server. Make sure the Flask server is running and a CSV file has been uploaded.".to_string(),
        }
    }

    pub fn unknown_error(self) -> String {
        match self {
            Locale::Romanian => "A apărut o eroare necunoscută.".to_string(),
            Locale::English => "An unknown error occurred.".to_string(),
        }
    }

    pub fn reminders_unreachable(self) -> String {
        match self {
            Locale::Romanian => "Eroare de rețea la trimiterea reminderelor.".to_string(),
            Locale::English => "Error: network failure while sending reminders.".to_string(),
        }
    }

    pub fn labels(self) -> Labels {
        match self {
            Locale::Romanian => Labels {
                lang: "ro",
                title: "Sistem de Gestiune și Analiză Plăți",
                upload_title: "Încărcă Fișier CSV",
                drop_hint: "Trage și plasează un fișier CSV aici",
                selected_file: "Fișier selectat:",
                browse: "Selectează din calculator",
                upload: "Încarcă Fișier",
                uploading: "Se încarcă...",
                stats_title: "Statistici Plăți",
                people: "persoane",
                paid_full: "Plătit Complet",
                paid_partial: "Plată Parțială",
                not_paid: "Nu au Plătit",
                send_reminders: "Trimite Remindere Plăți",
                sending_reminders: "Se trimit remindere...",
                last_updated: "Actualizat la",
            },
            Locale::English => Labels {
                lang: "en",
                title: "Payment Management and Analysis",
                upload_title: "Upload CSV File",
                drop_hint: "Drag and drop a CSV file here",
                selected_file: "Selected file:",
                browse: "Browse your computer",
                upload: "Upload File",
                uploading: "Uploading...",
                stats_title: "Payment Statistics",
                people: "people",
                paid_full: "Paid in full",
                paid_partial: "Partially paid",
                not_paid: "Not paid",
                send_reminders: "Send Payment Reminders",
                sending_reminders: "Sending reminders...",
                last_updated: "Updated at",
            },
        }
    }
}

/// Static page texts for the operator page.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub lang: &'static str,
    pub title: &'static str,
    pub upload_title: &'static str,
    pub drop_hint: &'static str,
    pub selected_file: &'static str,
    pub browse: &'static str,
    pub upload: &'static str,
    pub uploading: &'static str,
    pub stats_title: &'static str,
    pub people: &'static str,
    pub paid_full: &'static str,
    pub paid_partial: &'static str,
    pub not_paid: &'static str,
    pub send_reminders: &'static str,
    pub sending_reminders: &'static str,
    pub last_updated: &'static str,
}

fn count_or_unknown(value: Option<u64>) -> String {
    value.map_or_else(|| "?".to_string(), |count| count.to_string())
}
