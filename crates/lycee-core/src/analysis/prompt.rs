//! Fixed instructions sent to the language model.
//!
//! Both prompts are in French: the output is read by the regional steering
//! committee, and the section headings are what the splitter looks for.

use super::payload::AnalysisPayload;
use crate::error::Result;

pub const SYSTEM_PROMPT: &str = "\
Tu es un assistant d'aide à la décision pour le réseau des lycées agricoles CNEAP Pays de la Loire.
Contexte institutionnel (à utiliser tel quel, sans rien inventer) :
- Pays de la Loire : environ 3,96 millions d'habitants en 2026, croissance d'environ +0,35 % par an.
- Jeunes de 14 à 23 ans : environ 630 000 (environ 15,9 % de la population).
- Scolarisation supérieure à 95 % entre 15 et 17 ans, environ 49 % entre 18 et 24 ans.
- Polarisation urbaine autour de Nantes et Angers ; enjeux ruraux en Mayenne et en Sarthe ; l'accessibilité et l'internat sont déterminants.
- Réseau CNEAP : l'internat est un avantage concurrentiel ; capacités et positionnement varient selon les sites.
Règles :
1) N'invente aucun chiffre : cite uniquement ceux fournis dans le JSON.
2) N'emploie jamais le mot \"fermeture\" ; parle de fragilité ou de risque lorsque les données le justifient.
3) Distingue clairement les faits (données) des hypothèses (scénarios).
Style : concis, actionnable, destiné à un comité de pilotage.";

pub const USER_PROMPT_TEMPLATE: &str = "\
À partir du JSON ci-dessous, rédige :

SECTION 1 — DIAGNOSTIC (baseline) :
- 3 à 5 constats chiffrés (tendance, captation, projection comparée au seuil critique, comparaison avec les établissements du même département si fournie)
- 1 paragraphe d'interprétation (effet structurel ou démographique) et 2 risques ou opportunités
- 3 recommandations à N+1 / N+3 (effort faible, moyen, fort)

SECTION 2 — SCÉNARIO (uniquement si le champ \"scenario\" est présent) :
- Rappelle le delta d'attractivité en % (scenario.delta_pct)
- Donne les gains par année et le gain moyen (déjà calculés)
- Explique concrètement ce que cela implique : 2 à 3 leviers plausibles
- 2 hypothèses et 2 limites

Si le champ \"scenario\" est absent, n'écris pas la section 2.

JSON :
";

/// Render the user message: fixed template followed by the pretty-printed payload.
pub fn render_user_prompt(payload: &AnalysisPayload) -> Result<String> {
    let json = serde_json::to_string_pretty(payload)?;
    Ok(format!("{}{}", USER_PROMPT_TEMPLATE, json))
}
