/// What the print command reported back after accepting a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintReceipt {
    /// The command line that was executed.
    pub command: String,
    /// Queue job id, when the command printed one (`request id is office-42 ...`).
    pub job_id: Option<String>,
}

impl PrintReceipt {
    /// Builds a receipt from the print command's stdout.
    pub fn from_output(command: String, stdout: &str) -> Self {
        Self {
            command,
            job_id: parse_job_id(stdout),
        }
    }
}

fn parse_job_id(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.split_once("request id is ")
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .map(|id| id.to_string())
    })
}
