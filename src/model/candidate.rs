use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier of a candidate. Opaque beyond the category prefix.
pub type CandidateId = String;

/// The three elected offices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    President,
    Mayor,
    Deputy,
}

impl Category {
    /// All categories, in ballot order.
    pub const ALL: [Category; 3] = [Category::President, Category::Mayor, Category::Deputy];

    /// Single-letter prefix used when generating candidate ids.
    pub fn prefix(self) -> &'static str {
        match self {
            Category::President => "p",
            Category::Mayor => "m",
            Category::Deputy => "d",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::President => "president",
            Category::Mayor => "mayor",
            Category::Deputy => "deputy",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "president" => Ok(Category::President),
            "mayor" => Ok(Category::Mayor),
            "deputy" => Ok(Category::Deputy),
            other => Err(format!(
                "unknown category '{other}' (expected president, mayor or deputy)"
            )),
        }
    }
}

/// A candidate standing in one of the three categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub proposals: String,
    pub image_url: String,
    pub category: Category,
}

/// A candidate as submitted by the admin, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub name: String,
    pub party: String,
    pub proposals: String,
    #[serde(default = "default_image_url")]
    pub image_url: String,
    pub category: Category,
}

fn default_image_url() -> String {
    "/placeholder.svg".to_string()
}

impl NewCandidate {
    /// Promote to a full candidate with a freshly generated id.
    pub fn assign_id(self) -> Candidate {
        Candidate {
            id: super::generate_id(self.category.prefix()),
            name: self.name,
            party: self.party,
            proposals: self.proposals,
            image_url: self.image_url,
            category: self.category,
        }
    }
}

/// A partial edit to an existing candidate. `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub party: Option<String>,
    pub proposals: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<Category>,
}

impl CandidateUpdate {
    pub fn apply(self, candidate: &mut Candidate) {
        if let Some(name) = self.name {
            candidate.name = name;
        }
        if let Some(party) = self.party {
            candidate.party = party;
        }
        if let Some(proposals) = self.proposals {
            candidate.proposals = proposals;
        }
        if let Some(image_url) = self.image_url {
            candidate.image_url = image_url;
        }
        if let Some(category) = self.category {
            candidate.category = category;
        }
    }
}

impl Candidate {
    /// The slate seeded on first run: two candidates per category.
    pub fn default_slate() -> Vec<Candidate> {
        fn candidate(
            id: &str,
            name: &str,
            party: &str,
            proposals: &str,
            category: Category,
        ) -> Candidate {
            Candidate {
                id: id.to_string(),
                name: name.to_string(),
                party: party.to_string(),
                proposals: proposals.to_string(),
                image_url: default_image_url(),
                category,
            }
        }

        vec![
            candidate(
                "p1",
                "María González",
                "Partido del Progreso",
                "Enfoque en educación universal gratuita, reforma del sistema de salud \
                 y creación de empleos en tecnología verde.",
                Category::President,
            ),
            candidate(
                "p2",
                "Carlos Ramírez",
                "Alianza Nacional",
                "Reducción de impuestos para pequeñas empresas, fortalecimiento de la \
                 seguridad ciudadana y apoyo al sector agrícola.",
                Category::President,
            ),
            candidate(
                "m1",
                "Ana Martínez",
                "Movimiento Ciudadano",
                "Mejora del transporte público, construcción de parques comunitarios \
                 y programa de vivienda accesible.",
                Category::Mayor,
            ),
            candidate(
                "m2",
                "José López",
                "Partido Verde Local",
                "Reciclaje obligatorio, incentivos para energía solar y expansión de \
                 ciclovías en toda la ciudad.",
                Category::Mayor,
            ),
            candidate(
                "d1",
                "Laura Fernández",
                "Partido Progresista",
                "Leyes de protección al consumidor, transparencia gubernamental y \
                 derechos laborales modernos.",
                Category::Deputy,
            ),
            candidate(
                "d2",
                "Roberto Silva",
                "Unión Democrática",
                "Apoyo a la agricultura familiar, reforma educativa y mejora de \
                 infraestructura rural.",
                Category::Deputy,
            ),
        ]
    }
}
