//! Prompt templates for the interview flow

use super::persona::Persona;
use crate::interview::orchestrator::Directive;
use crate::interview::profile::LeadProfile;
use crate::interview::stage::Stage;

/// Templates for every stage of the interview
///
/// Each stage has exactly one canned message. The model rephrases it to fit
/// the conversation; the offline gateway sends it verbatim.
pub struct PromptTemplate;

impl PromptTemplate {
    /// Fixed opening message, sent without a model call
    pub fn greeting(persona: &Persona) -> String {
        format!(
            "Hi, I'm {} from {}. I run a short interview about how your organisation works \
             and then put together a personalised {} for you. It takes about ten minutes. \
             Shall we get started?",
            persona.assistant_name, persona.company_name, persona.report_name
        )
    }

    /// Canned question asked when a stage is entered
    pub fn stage_prompt(stage: Stage, persona: &Persona) -> String {
        match stage {
            Stage::AwaitingEngagement => Self::greeting(persona),
            Stage::Discovery => "Great! To begin, what is the name of your organisation, \
                                 and which industry do you operate in?"
                .to_string(),
            Stage::Scoping => {
                "Thanks. Roughly how many people does your organisation employ?".to_string()
            }
            Stage::AccountCreation => format!(
                "Perfect. What's the best email address for your {}? \
                 We'll set up your account with it so you can access the results.",
                persona.report_name
            ),
            Stage::InterviewBriefing => "Your account is being set up. Next come three short \
                                         questions about how your organisation works today. \
                                         Answer in as much detail as you like. Ready to begin?"
                .to_string(),
            Stage::InterviewQ1 => "Question 1 of 3: Which repetitive tasks take up most of \
                                   your team's time each week?"
                .to_string(),
            Stage::InterviewQ2 => "Question 2 of 3: How does your organisation currently \
                                   store and share its data and documents?"
                .to_string(),
            Stage::InterviewQ3 => "Question 3 of 3: What would you most like AI to help your \
                                   organisation achieve in the next twelve months?"
                .to_string(),
            Stage::ReportDelivery => Self::closing(persona),
        }
    }

    /// Canned follow-up when a reply did not satisfy the stage
    pub fn reprompt(stage: Stage, persona: &Persona) -> String {
        match stage {
            Stage::AwaitingEngagement => {
                "No problem. Whenever you're ready, just say yes and we'll begin.".to_string()
            }
            Stage::Discovery => {
                "Could you share your organisation's name and the industry you work in?"
                    .to_string()
            }
            Stage::Scoping => {
                "Could you give me an approximate number of employees? A rough figure is fine."
                    .to_string()
            }
            Stage::AccountCreation => "That doesn't look like a valid email address. \
                                       Could you double-check it for me?"
                .to_string(),
            Stage::InterviewBriefing => {
                "Take your time. Let me know when you're ready for the first question."
                    .to_string()
            }
            Stage::InterviewQ1 | Stage::InterviewQ2 | Stage::InterviewQ3 => format!(
                "I didn't catch an answer there. {}",
                Self::stage_prompt(stage, persona)
            ),
            Stage::ReportDelivery => Self::closing(persona),
        }
    }

    /// Closing statement
    pub fn closing(persona: &Persona) -> String {
        format!(
            "Thank you, the interview is complete. Your {} is now being prepared \
             and will arrive in your inbox shortly.",
            persona.report_name
        )
    }

    /// The canned text a directive stands for
    pub fn canned(directive: &Directive, persona: &Persona) -> String {
        match directive {
            Directive::Greeting => Self::greeting(persona),
            Directive::Ask(stage) => Self::stage_prompt(*stage, persona),
            Directive::Reask(stage) => Self::reprompt(*stage, persona),
            Directive::Close => Self::closing(persona),
        }
    }

    /// System instruction for generating the next assistant utterance
    pub fn system_prompt(directive: &Directive, persona: &Persona, profile: &LeadProfile) -> String {
        let mut prompt = format!(
            r#"You are {name}, a friendly interviewer working for {company}.
You are guiding a website visitor through a short structured interview that ends with a personalised {report}.

Rules:
- Write exactly one message, addressed to the visitor.
- Keep it under 80 words, warm and professional.
- Cover only the goal below. Do not ask about anything else and do not skip ahead.
- Never invent facts about the visitor's organisation.
"#,
            name = persona.assistant_name,
            company = persona.company_name,
            report = persona.report_name,
        );

        let goal = match directive {
            Directive::Greeting | Directive::Ask(_) => {
                "Acknowledge the visitor's last reply briefly, then ask the question below."
            }
            Directive::Reask(_) => {
                "The visitor's last reply did not give what this step needs. \
                 Politely ask again, in different words if helpful."
            }
            Directive::Close => {
                "Close the interview. Thank the visitor and tell them the interview is complete \
                 and their report is being prepared. Do not ask any further questions."
            }
        };
        prompt.push_str(&format!(
            "\nGoal: {}\nMessage to convey:\n{}\n",
            goal,
            Self::canned(directive, persona)
        ));

        let known = profile.summary_lines();
        if !known.is_empty() {
            prompt.push_str("\nWhat the visitor has told you so far:\n");
            for line in known {
                prompt.push_str(&format!("- {}\n", line));
            }
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::termination::mentions_closing_phrase;

    #[test]
    fn test_discovery_asks_for_organisation_and_industry() {
        let prompt = PromptTemplate::stage_prompt(Stage::Discovery, &Persona::default());
        assert!(prompt.contains("name of your organisation"));
        assert!(prompt.contains("industry"));
    }

    #[test]
    fn test_only_closing_matches_closing_phrases() {
        let persona = Persona::default();
        for stage in Stage::ALL {
            let prompt = PromptTemplate::stage_prompt(stage, &persona);
            let reprompt = PromptTemplate::reprompt(stage, &persona);
            let expect = stage.is_terminal();
            assert_eq!(mentions_closing_phrase(&prompt), expect, "{stage}");
            assert_eq!(mentions_closing_phrase(&reprompt), expect, "{stage}");
        }
        assert!(mentions_closing_phrase(&PromptTemplate::closing(&persona)));
    }

    #[test]
    fn test_greeting_uses_persona() {
        let persona = Persona {
            assistant_name: "Sam".to_string(),
            ..Persona::default()
        };
        assert!(PromptTemplate::greeting(&persona).starts_with("Hi, I'm Sam from"));
    }

    #[test]
    fn test_system_prompt_includes_directive_and_profile() {
        let mut profile = LeadProfile::default();
        profile.organisation = Some("Acme".to_string());
        let prompt = PromptTemplate::system_prompt(
            &Directive::Ask(Stage::Scoping),
            &Persona::default(),
            &profile,
        );
        assert!(prompt.contains("how many people"));
        assert!(prompt.contains("Organisation: Acme"));

        let closing =
            PromptTemplate::system_prompt(&Directive::Close, &Persona::default(), &profile);
        assert!(closing.contains("interview is complete"));
    }

    #[test]
    fn test_reask_for_questions_repeats_question() {
        let prompt = PromptTemplate::reprompt(Stage::InterviewQ2, &Persona::default());
        assert!(prompt.contains("Question 2 of 3"));
    }
}
