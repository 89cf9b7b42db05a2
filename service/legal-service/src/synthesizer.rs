use tracing::info;

use crate::generator::{CompletionRequest, Generator};
use crate::ServiceError;

pub const SYSTEM_PROMPT: &str = "Anda adalah asisten hukum yang hanya boleh menjawab berdasarkan dokumen yang diberikan. Anda boleh merangkum jika diperlukan.";

/// Answer rules, highest priority first.
const RULES: [&str; 9] = [
    "Bacalah dengan cermat semua informasi yang tersedia di dalam dokumen hukum (UU PDP).",
    "Prioritaskan menggunakan informasi dari dokumen terlebih dahulu untuk menjawab.",
    "Jika istilah atau konsep yang ditanyakan tidak muncul persis sama, gunakan pemahaman dari istilah terkait di dokumen (misalnya: definisi, tujuan, kategori, hak, kewajiban).",
    "Jika pertanyaan meminta nomor pasal tertentu, jawab dengan hanya menyebutkan nomor pasal yang relevan.",
    "Jika pertanyaan menanyakan isi atau bunyi pasal, tuliskan isi pasal dengan nomor tersebut sesuai dokumen.",
    "Jika dokumen sama sekali tidak mencakup jawaban, baru Anda boleh memberikan penjelasan umum berdasarkan konteks online.",
    "Namun, pastikan Anda selalu mengecek apakah konteks tambahan tersebut sesuai atau terkait dengan dokumen yang diberikan.",
    "Jika setelah semua pengecekan tidak ada relevansi, minta maaf bahwa jawaban tidak ditemukan berdasarkan dokumen.",
    "Jika Anda membuat daftar item (seperti langkah, dokumen, atau syarat), gunakan penomoran atau tanda bullet (1., 2., 3. ...).",
];

/// Join retrieved documents into one context block separated by blank lines.
pub fn build_context(documents: &[&str]) -> String {
    documents.join("\n\n")
}

pub fn build_user_prompt(question: &str, context: &str) -> String {
    let mut prompt = String::from(
        "Anda adalah asisten hukum yang bertugas membantu menjawab pertanyaan user berdasarkan dokumen hukum yang diberikan.\n\nAturan main Anda:\n",
    );
    for rule in RULES {
        prompt.push_str("- ");
        prompt.push_str(rule);
        prompt.push('\n');
    }
    prompt.push_str("\n---\nInformasi (Dokumen Hukum):\n");
    prompt.push_str(context);
    prompt.push_str("\n\n---\nPertanyaan:\n");
    prompt.push_str(question);
    prompt.push_str("\n\n---\nJawaban:\n");
    prompt
}

#[derive(Debug, Clone)]
pub struct AnswerSynthesizer {
    pub temperature: f32,
    pub max_tokens: usize,
    pub apology: String,
}

impl AnswerSynthesizer {
    /// Grounded answer for `question`. With no documents the apology is returned without
    /// calling the generator.
    pub fn synthesize(
        &self,
        generator: &dyn Generator,
        question: &str,
        documents: &[&str],
    ) -> Result<String, ServiceError> {
        if documents.is_empty() {
            info!("no documents retrieved; answering with apology");
            return Ok(self.apology.clone());
        }
        let context = build_context(documents);
        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(question, &context),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        Ok(generator.complete(&request)?)
    }
}
