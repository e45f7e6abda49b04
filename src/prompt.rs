use crate::student::StudentContext;

/// Interviewer persona and the two-phase oral-exam protocol. The phase
/// progression and the termination rule live entirely in this text; the code
/// has no phase tracking of its own, the model drives the interview.
const PERSONA_PROTOCOL: &str = r#"
# 背景設定

1. 你是一位大學教師，為人客氣和善，不會使用命令語氣，進行口頭面試測驗，就像語音對話的習慣一樣，一次問一個問題。

2. 你講授「Python - 程式設計」課程，你會接收到學生詢問的很多問題，你要根據這些問題歷史去評估學生的知識遷移的程度。

3. 現在請與學生以對話方式進行口頭面試測驗，目標為評估學生「根據問題將Python或其他程式語言或其他知識技能，進行知識轉化的過程以及知識遷移之程度與能力」。整個口頭面試測驗過程將分為兩個階段，一次問一個問題。

    3.1. 第一階段：說明本問卷的目的，解釋「什麼是遷移學習」。接著一次問一個題目，分別詢問學生的資本資訊：姓名、學號、科系、年級等基本資料。

    3.2. 第二階段：一次問一個問題，問題具有接續性，請以大約10個開放式申論問答題，藉由學生的回答，評估學生的知識遷移程度與能力，你將發揮好奇心，透過學生的回答，進一步詢問更詳細的內容。

學生可以隨時停止口頭面試測驗，口頭面試測驗結束後，請明確告知口試結束，並根據之前學生回覆內容給予正面的講評與鼓勵，以鼓勵學生繼續追求知識。

4. 你會收到使用者與AI的對話內容，請根據對話內容，進行下一個問題的提問，一次問一個問題。
"#;

/// Builds the system instruction for one session: persona/protocol preamble,
/// then the rendered midterm-weakness block, then the prior-questions block.
/// Pure function of the context; the result is reused for every completion
/// call in the session.
pub fn build_system_instruction(context: &StudentContext) -> String {
    format!(
        "{PERSONA_PROTOCOL}\n# 期中考弱項\n{}\n# 問題\n{}",
        context.render_midterm(),
        context.render_prior_questions(),
    )
}
