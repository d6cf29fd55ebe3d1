//! Seed the database with the admin user and the initial service catalog.
//!
//! Safe to re-run: the admin user is kept if it already exists and services
//! are upserted by title.

use dotenvy::dotenv;
use migration::MigratorTrait;
use std::sync::Arc;
use tracing::{info, warn};

use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::catalog;

struct SeedService {
    title: &'static str,
    description: &'static str,
    img: &'static str,
}

const SEED_SERVICES: &[SeedService] = &[
    SeedService {
        title: "Cirugías Programadas",
        description: "Realizamos cirugías veterinarias con equipos de última generación y personal altamente calificado. Ofrecemos procedimientos seguros con anestesia monitoreada y cuidados post-operatorios especializados para garantizar la recuperación de tu mascota.",
        img: "/img/servicios/CirugiasProgramadas.webp",
    },
    SeedService {
        title: "Baños y Cortes Higiénicos",
        description: "Servicio profesional de estética canina y felina. Incluye baño con productos especializados según el tipo de pelaje, corte de uñas, limpieza de oídos, glándulas anales y cortes de pelo personalizados para mantener a tu mascota limpia y saludable.",
        img: "/img/servicios/BañosyCortes.webp",
    },
    SeedService {
        title: "Toma de Muestras para Laboratorio",
        description: "Servicio de diagnóstico clínico mediante análisis de sangre, orina, heces y otros estudios especializados. Contamos con laboratorio propio para resultados rápidos y precisos que permiten detectar enfermedades a tiempo.",
        img: "/img/servicios/Toma de muestras.webp",
    },
    SeedService {
        title: "Vacunas",
        description: "Plan completo de vacunación para perros y gatos de todas las edades. Protegemos a tu mascota contra enfermedades como rabia, parvovirus, moquillo, leucemia felina y más. Contamos con vacunas de las mejores marcas con certificado oficial.",
        img: "/img/servicios/Vacunas.webp",
    },
    SeedService {
        title: "Vitaminas",
        description: "Suplementos vitamínicos y nutricionales específicos para cada etapa de vida de tu mascota. Mejoramos el sistema inmunológico, salud del pelaje, articulaciones y energía con productos de alta calidad y recomendación veterinaria.",
        img: "/img/servicios/Vitaminas.webp",
    },
    SeedService {
        title: "Alimento Premium",
        description: "Amplio catálogo de alimentos premium y super premium para perros y gatos. Marcas reconocidas con fórmulas especializadas según edad, tamaño, raza y condiciones especiales. Nutrición balanceada para una vida más saludable.",
        img: "/img/servicios/AlimentoPremium.webp",
    },
    SeedService {
        title: "Desparasitantes Externos e Internos",
        description: "Productos antiparasitarios de última generación para eliminar y prevenir pulgas, garrapatas, ácaros y parásitos internos. Pipetas, collares, tabletas y soluciones inyectables con efectividad comprobada y segura para tu mascota.",
        img: "/img/servicios/Desparasitantes.webp",
    },
    SeedService {
        title: "Accesorios",
        description: "Gran variedad de accesorios para el cuidado y confort de tu mascota: collares, correas, juguetes, camas, platos, transportadoras, ropa y más. Productos de calidad a precios accesibles para consentir a tu mejor amigo.",
        img: "/img/servicios/Accesorios.webp",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // Admin user
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@clinica.local".to_string());
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Clinic Admin".to_string());
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) => p,
        Err(_) => {
            warn!("ADMIN_PASSWORD not set; seeding admin with a default password, change it before deploying");
            "change-me-now".to_string()
        }
    };

    let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let auth = AuthService::new(
        repo,
        AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() },
    );
    match auth
        .register(service::auth::domain::RegisterInput {
            email: email.clone(),
            name,
            password,
            role: "ADMIN".into(),
        })
        .await
    {
        Ok(user) => info!(user_id = %user.id, email = %user.email, "admin user created"),
        Err(AuthError::Conflict) => info!(email = %email, "admin user already exists, skipping"),
        Err(e) => return Err(e.into()),
    }

    // Service catalog, upserted by title
    for s in SEED_SERVICES {
        let m = catalog::upsert_service_by_title(&db, s.title, s.description, Some(s.img), true).await?;
        info!(id = %m.id, title = %m.title, "service seeded");
    }

    info!(count = SEED_SERVICES.len(), "seed complete");
    Ok(())
}
